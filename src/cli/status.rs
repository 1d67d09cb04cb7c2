//! Status command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::automation::load_automation;
use crate::color::to_hex;
use crate::config::loader::find_config;
use crate::config::FvizConfig;
use crate::manifest::{Manifest, TemplateLibrary};
use crate::panel::{format_percentage, AUTOMATION_LABEL};

use super::{display, EXIT_SUCCESS};

/// Execute the status command
pub fn run_status(config: &FvizConfig, explicit: Option<&Path>) -> ExitCode {
    print!("{}", status_report(config, explicit));
    ExitCode::from(EXIT_SUCCESS)
}

fn status_report(config: &FvizConfig, explicit: Option<&Path>) -> String {
    let config_line = match explicit.map(Path::to_path_buf).or_else(find_config) {
        Some(path) => display(&path),
        None => "(defaults)".to_string(),
    };

    let foods = &config.assets.foods;
    let manifest = Manifest::load_or_empty(&foods.join(&config.assets.manifest));
    let library = TemplateLibrary::load(foods, &manifest);
    let theme = config.resolve_theme();
    let automation = load_automation(&config.assets.automation);

    let mut out = String::new();
    out.push_str(&format!("Config:     {}\n", config_line));
    out.push_str(&format!("Foods:      {}\n", display(foods)));
    out.push_str(&format!(
        "Templates:  {} loaded of {} listed\n",
        library.len(),
        manifest.entries().len()
    ));
    for id in library.ids() {
        if let Some(template) = library.get(id) {
            out.push_str(&format!("  {} ({}x{})\n", id, template.width(), template.height()));
        }
    }
    let colors: Vec<String> = theme.palette.colors().iter().map(|c| to_hex(*c)).collect();
    out.push_str(&format!("Theme:      {} [{}]\n", theme.name, colors.join(", ")));
    out.push_str(&format!(
        "Surface:    {}x{}\n",
        config.surface.width, config.surface.height
    ));
    out.push_str(&format!("{}: {}\n", AUTOMATION_LABEL, format_percentage(automation)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_status_report_lists_templates() {
        let dir = tempdir().unwrap();
        let foods = dir.path().join("foods");
        fs::create_dir_all(&foods).unwrap();
        fs::write(foods.join("manifest.json"), r#"["pea.json", "gone.json"]"#).unwrap();
        fs::write(foods.join("pea.json"), r#"["121", "212"]"#).unwrap();
        let automation = dir.path().join("auto.json");
        fs::write(&automation, r#"{"automation_percentage": 42.5}"#).unwrap();

        let mut config = FvizConfig::default();
        config.assets.foods = foods;
        config.assets.automation = automation;

        let config_path = dir.path().join("fviz.toml");
        let report = status_report(&config, Some(&config_path));
        assert!(report.contains("1 loaded of 2 listed"));
        assert!(report.contains("  pea (3x2)"));
        assert!(report.contains("Theme:      wall [#D4C454, #447604, #208AAE, #F28482]"));
        assert!(report.contains("VI Task Automation: 42.5%"));
    }
}
