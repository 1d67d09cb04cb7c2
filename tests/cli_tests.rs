//! Integration tests for the fviz CLI
//!
//! These run the binary inside a temporary project directory and check exit
//! codes, console output and the files written.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use image::{Rgba, RgbaImage};
use tempfile::{tempdir, TempDir};

fn fviz(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fviz"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute fviz")
}

/// A project with a config, two templates and an automation file.
fn project() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("fviz.toml"),
        r#"
seed = 11

[assets]
foods = "foods"
automation = "vi_auto_data.json"

[timing]
transition_ms = 500
hold_ms = 1000

[surface]
width = 120
height = 80
"#,
    )
    .unwrap();

    let foods = dir.path().join("foods");
    fs::create_dir_all(&foods).unwrap();
    fs::write(foods.join("manifest.json"), r#"["pea.json", "bean.json"]"#).unwrap();
    fs::write(foods.join("pea.json"), r#"["1221", "2332", "1221"]"#).unwrap();
    fs::write(foods.join("bean.json"), r#"[[4,4,4],[4,1,4],[4,4,4]]"#).unwrap();
    fs::write(dir.path().join("vi_auto_data.json"), r#"{"automation_percentage": 75}"#).unwrap();
    dir
}

#[test]
fn test_frame_writes_png_at_surface_size() {
    let dir = project();
    let output = fviz(dir.path(), &["frame", "--at", "2000", "-o", "out/frame.png"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Saved:"));

    let image = image::open(dir.path().join("out/frame.png")).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (120, 80));
}

#[test]
fn test_frame_is_reproducible_with_seed() {
    let dir = project();
    for name in ["a.png", "b.png"] {
        let output = fviz(dir.path(), &["frame", "--at", "4200", "-o", name]);
        assert!(output.status.success());
    }
    let a = fs::read(dir.path().join("a.png")).unwrap();
    let b = fs::read(dir.path().join("b.png")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_frame_size_override() {
    let dir = project();
    let output =
        fviz(dir.path(), &["frame", "--width", "64", "--height", "48", "-o", "small.png"]);
    assert!(output.status.success());
    let image = image::open(dir.path().join("small.png")).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (64, 48));
}

#[test]
fn test_frame_without_templates_fails() {
    let dir = project();
    fs::write(dir.path().join("foods/manifest.json"), "[]").unwrap();
    let output = fviz(dir.path(), &["frame", "-o", "none.png"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No templates loaded"));
    assert!(!dir.path().join("none.png").exists());
}

#[test]
fn test_animate_writes_gif() {
    let dir = project();
    let output = fviz(dir.path(), &["animate", "--fps", "5", "--duration", "1000", "-o", "c.gif"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("(6 frames)"));
    assert!(dir.path().join("c.gif").exists());
}

#[test]
fn test_convert_then_preview() {
    let dir = project();
    let mut image = RgbaImage::from_pixel(3, 3, Rgba([0x44, 0x76, 0x04, 255]));
    image.put_pixel(1, 1, Rgba([0xF2, 0x84, 0x82, 255]));
    image.save(dir.path().join("cherry.png")).unwrap();

    let output = fviz(dir.path(), &["convert", "*.png", "--size", "3"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = fs::read_to_string(dir.path().join("foods/cherry.json")).unwrap();
    let rows: Vec<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(rows, vec!["222", "242", "222"]);

    let manifest = fs::read_to_string(dir.path().join("foods/manifest.json")).unwrap();
    let entries: Vec<String> = serde_json::from_str(&manifest).unwrap();
    assert_eq!(entries, vec!["pea.json", "bean.json", "cherry.json"]);

    let output = fviz(dir.path(), &["preview", "foods/cherry.json", "--scale", "4", "-o", "c.png"]);
    assert!(output.status.success());
    let preview = image::open(dir.path().join("c.png")).unwrap().to_rgba8();
    assert_eq!(preview.dimensions(), (12, 12));
    assert_eq!(*preview.get_pixel(5, 5), Rgba([0xF2, 0x84, 0x82, 255]));
}

#[test]
fn test_convert_missing_file_fails() {
    let dir = project();
    let output = fviz(dir.path(), &["convert", "nope.png"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.png"));
}

#[test]
fn test_status_reports_project() {
    let dir = project();
    let output = fviz(dir.path(), &["status"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 loaded of 2 listed"));
    assert!(stdout.contains("VI Task Automation: 75.0%"));
}

#[test]
fn test_invalid_config_exits_with_usage_code() {
    let dir = project();
    fs::write(dir.path().join("fviz.toml"), "[timing]\ntransition_ms = 0\n").unwrap();
    let output = fviz(dir.path(), &["status"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("transition_ms"));
}

#[test]
fn test_unknown_command_is_usage_error() {
    let dir = project();
    let output = fviz(dir.path(), &["bake"]);
    assert_eq!(output.status.code(), Some(2));
}
