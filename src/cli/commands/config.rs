use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::bail;

use crate::config::loader::{self, ConfigError};
use crate::config::schema::{ConfigModel, SECTION_NAMES};
use crate::config::validation::validate_config;
use crate::config::{Paths, Settings};

const CONFIG_HEADER: &str = "# ChatGPT web share configuration\n\
# Every key is optional; omitted keys use the defaults shown here.\n\
# Change auth.jwt_secret, auth.user_secret and the initial admin password before exposing the service.\n\n";

pub fn handle_init(force: bool, custom_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = custom_path.unwrap_or_else(Paths::config_file);

    if config_path.exists() && !force && !confirm_overwrite(&config_path)? {
        println!("Aborted.");
        return Ok(());
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let config_content = generate_default_config_yaml()?;
    fs::write(&config_path, config_content)?;
    set_file_permissions(&config_path);

    println!("Config created at {}", config_path.display());
    println!("Check it with: cws-config validate");

    Ok(())
}

pub fn handle_show(
    settings: &Settings,
    json: bool,
    section: Option<&str>,
) -> anyhow::Result<()> {
    if let Some(name) = section {
        if !SECTION_NAMES.contains(&name) {
            bail!(
                "Unknown section '{name}'. Valid sections: {}",
                SECTION_NAMES.join(", ")
            );
        }
    }

    let config = match settings.get() {
        Ok(config) => config,
        Err(ConfigError::MissingFile { path }) => {
            eprintln!(
                "No config file found at {}; showing defaults",
                path.display()
            );
            Arc::new(ConfigModel::default())
        }
        Err(err) => return Err(err.into()),
    };

    let mut value = serde_json::to_value(config.as_ref())?;
    if let Some(name) = section {
        let section_value = value
            .get(name)
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        let mut wrapped = serde_json::Map::new();
        wrapped.insert(name.to_string(), section_value);
        value = serde_json::Value::Object(wrapped);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", serde_yaml::to_string(&value)?);
    }

    Ok(())
}

pub fn handle_validate(settings: &Settings) -> anyhow::Result<()> {
    let config = settings.get()?;
    let result = validate_config(&config);

    if !result.warnings.is_empty() {
        println!("Warnings:");
        for warning in &result.warnings {
            println!("  - {}: {}", warning.field, warning.message);
        }
    }

    println!("Configuration valid: {}", settings.path().display());
    Ok(())
}

fn confirm_overwrite(path: &Path) -> anyhow::Result<bool> {
    print!(
        "Config already exists at {}. Overwrite? [y/N] ",
        path.display()
    );
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let response = input.trim();
    Ok(response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes"))
}

// The file carries secrets.
fn set_file_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
            eprintln!("Warning: failed to set config file permissions: {err}");
        }
    }
}

fn generate_default_config_yaml() -> Result<String, ConfigError> {
    let body = loader::to_yaml(&ConfigModel::default())?;
    Ok(format!("{CONFIG_HEADER}{body}"))
}
