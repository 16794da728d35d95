//! The config command

use anyhow::{Context, Result};
use dobie_config::GlobalConfig;
use std::path::Path;

/// Show, locate, or edit the global configuration
pub async fn config(edit: bool, path_only: bool) -> Result<()> {
    let config_path = GlobalConfig::config_path()?;

    if path_only {
        println!("{}", config_path.display());
        return Ok(());
    }

    if edit {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

        if !config_path.exists() {
            GlobalConfig::default().save()?;
            println!("Created default config at {:?}", config_path);
        }

        std::process::Command::new(&editor)
            .arg(&config_path)
            .status()
            .context(format!("Failed to open editor: {}", editor))?;

        // Catch mistakes now rather than on the next command
        let edited = GlobalConfig::load_from(&config_path)?;
        if let Err(e) = edited.validate() {
            eprintln!("Warning: {}", e);
        }
    } else {
        print!("{}", render_config(&config_path)?);
    }

    Ok(())
}

/// Text shown by `dobie config`: the file if it exists, otherwise the defaults
pub fn render_config(config_path: &Path) -> Result<String> {
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {:?}", config_path))?;
        Ok(format!("# Config file: {:?}\n\n{}\n", config_path, content))
    } else {
        let defaults = toml::to_string_pretty(&GlobalConfig::default())?;
        Ok(format!(
            "# Config file: {:?} (not created yet)\n\n# Default configuration:\n{}\n# Run 'dobie config --edit' to create and edit the config file.\n",
            config_path, defaults
        ))
    }
}
