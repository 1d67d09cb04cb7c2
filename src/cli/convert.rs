//! Convert and preview command implementations

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use tracing::{debug, warn};

use crate::config::FvizConfig;
use crate::manifest::Manifest;
use crate::output::{save_png, scale_image};
use crate::template::{Template, TemplateError};

use super::{display, expand_inputs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the convert command
///
/// Each image becomes `<foods>/<stem>.json` and is appended to the manifest
/// if not already listed. A failing image is reported and skipped; the exit
/// code is an error if any image failed.
pub fn run_convert(config: &FvizConfig, inputs: &[String], foods: &Path, size: u32) -> ExitCode {
    let theme = config.resolve_theme();
    let required = (size > 0).then_some((size, size));
    let manifest_path = foods.join(&config.assets.manifest);
    let mut manifest = Manifest::load_or_empty(&manifest_path);

    let files = expand_inputs(inputs);
    if files.is_empty() {
        eprintln!("Error: No input files");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    if let Err(e) = fs::create_dir_all(foods) {
        eprintln!("Error: Cannot create '{}': {}", display(foods), e);
        return ExitCode::from(EXIT_ERROR);
    }

    let mut failed = 0usize;
    let mut added = 0usize;
    for file in &files {
        let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
            eprintln!("Error: Cannot derive a template name from '{}'", display(file));
            failed += 1;
            continue;
        };

        let template = match convert_image(file, &theme.palette, required) {
            Ok(template) => template,
            Err(e) => {
                eprintln!("Error: {}: {}", display(file), e);
                failed += 1;
                continue;
            }
        };

        let entry = format!("{}.json", stem);
        let out_path = foods.join(&entry);
        let written = template
            .to_json_string()
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&out_path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Error: Failed to save '{}': {}", display(&out_path), e);
            failed += 1;
            continue;
        }
        println!("Saved: {}", display(&out_path));

        if manifest.add(&entry) {
            added += 1;
        } else {
            debug!("{} already in manifest", entry);
        }
    }

    if added > 0 {
        if let Err(e) = manifest.save(&manifest_path) {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Updated: {} (+{})", display(&manifest_path), added);
    }

    if failed > 0 {
        warn!("{} of {} images failed to convert", failed, files.len());
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

fn convert_image(
    path: &Path,
    palette: &crate::palette::Palette,
    required: Option<(u32, u32)>,
) -> Result<Template, TemplateError> {
    let image = image::open(path)?.to_rgba8();
    Template::from_image(&image, palette, required)
}

/// Execute the preview command
pub fn run_preview(config: &FvizConfig, input: &Path, output: &Path, scale: u32) -> ExitCode {
    let template = match Template::load(input) {
        Ok(template) => template,
        Err(e) => {
            eprintln!("Error: {}: {}", display(input), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let theme = config.resolve_theme();
    let image = scale_image(template.to_image(&theme.palette), scale);
    if let Err(e) = save_png(&image, output) {
        eprintln!("Error: Failed to save '{}': {}", display(output), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved: {}", display(output));
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Theme;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn wall_image() -> RgbaImage {
        let palette = Theme::wall().palette;
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, palette.get(0).unwrap());
        image.put_pixel(1, 0, palette.get(1).unwrap());
        image.put_pixel(0, 1, palette.get(2).unwrap());
        image.put_pixel(1, 1, Rgba([250, 130, 130, 255]));
        image
    }

    #[test]
    fn test_convert_writes_template_and_manifest() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("plum.png");
        wall_image().save(&png).unwrap();
        let foods = dir.path().join("foods");

        let inputs = vec![png.display().to_string()];
        let code = run_convert(&FvizConfig::default(), &inputs, &foods, 2);
        assert_eq!(code, ExitCode::from(EXIT_SUCCESS));

        let template = Template::load(&foods.join("plum.json")).unwrap();
        assert_eq!(template, Template::from_strings(&["12", "34"]).unwrap());

        let manifest = Manifest::load(&foods.join("manifest.json")).unwrap();
        assert_eq!(manifest.entries(), &["plum.json".to_string()]);

        // Converting again leaves the manifest alone
        run_convert(&FvizConfig::default(), &inputs, &foods, 2);
        let manifest = Manifest::load(&foods.join("manifest.json")).unwrap();
        assert_eq!(manifest.entries().len(), 1);
    }

    #[test]
    fn test_convert_rejects_wrong_size() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("plum.png");
        wall_image().save(&png).unwrap();
        let foods = dir.path().join("foods");

        let code = run_convert(&FvizConfig::default(), &[png.display().to_string()], &foods, 40);
        assert_eq!(code, ExitCode::from(EXIT_ERROR));
        assert!(!foods.join("plum.json").exists());
        assert!(!foods.join("manifest.json").exists());
    }

    #[test]
    fn test_preview_paints_palette() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pea.json");
        fs::write(&input, r#"["12", "09"]"#).unwrap();
        let output = dir.path().join("pea.png");

        let code = run_preview(&FvizConfig::default(), &input, &output, 2);
        assert_eq!(code, ExitCode::from(EXIT_SUCCESS));

        let image = image::open(&output).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (4, 4));
        assert_eq!(*image.get_pixel(0, 0), Theme::wall().palette.get(0).unwrap());
        assert_eq!(image.get_pixel(3, 3).0[3], 0);
    }
}
