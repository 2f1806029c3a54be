//! Config command - inspect and edit the stmtx settings file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;
use tracing::debug;

use stmtx_core::StmtxConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings as JSON
    Show,

    /// Write a settings file holding the defaults
    Init {
        /// Where to write the file (default: the selected settings file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one setting, e.g. "parser.section_marker"
    Get { key: String },

    /// Change one setting and save the file
    Set {
        /// Dotted setting name, e.g. "report.write_json"
        key: String,
        /// JSON value; bare words are stored as strings
        value: String,
    },

    /// Print where the settings file lives
    Path,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let file = settings_file(config_path);

    match args.action {
        ConfigAction::Show => {
            if !file.exists() {
                println!("{} {} does not exist, using defaults.", style("ℹ").blue(), file.display());
            }
            println!("{}", serde_json::to_string_pretty(&load(config_path)?)?);
        }
        ConfigAction::Init { output, force } => {
            let target = output.unwrap_or(file);
            write_defaults(&target, force)?;
            println!("{} Wrote default settings to {}", style("✓").green(), target.display());
        }
        ConfigAction::Get { key } => {
            let settings = serde_json::to_value(load(config_path)?)?;
            let value = lookup(&settings, &key)?;
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        ConfigAction::Set { key, value } => {
            let value = parse_value(&value);
            update(&file, &key, value.clone())?;
            println!("{} {} = {}", style("✓").green(), key, value);
        }
        ConfigAction::Path => {
            let status = if file.exists() {
                style("exists").green()
            } else {
                style("missing, run 'stmtx config init'").yellow()
            };
            println!("{} ({})", file.display(), status);
        }
    }

    Ok(())
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stmtx")
        .join("config.json")
}

fn settings_file(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the configuration for a command.
///
/// An explicit path must exist; otherwise the default file is used when present.
pub fn load(config_path: Option<&str>) -> anyhow::Result<StmtxConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(StmtxConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(StmtxConfig::from_file(&default_path)?)
    } else {
        Ok(StmtxConfig::default())
    }
}

fn write_defaults(target: &Path, force: bool) -> anyhow::Result<()> {
    if target.exists() && !force {
        anyhow::bail!("{} already exists; pass --force to replace it", target.display());
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    StmtxConfig::default().save(target)?;
    Ok(())
}

fn update(file: &Path, key: &str, value: Value) -> anyhow::Result<()> {
    let current = if file.exists() {
        StmtxConfig::from_file(file)?
    } else {
        StmtxConfig::default()
    };

    let mut settings = serde_json::to_value(current)?;
    set_json_path(&mut settings, key, value)?;
    // Round-trip through the typed config so a wrongly typed value is rejected
    let updated: StmtxConfig = serde_json::from_value(settings)?;

    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }
    updated.save(file)?;
    debug!("Saved {} to {}", key, file.display());
    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn lookup<'a>(settings: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.').try_fold(settings, |node, part| {
        node.get(part)
            .ok_or_else(|| anyhow::anyhow!("Unknown setting: {}", key))
    })
}

fn set_json_path(settings: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };

    let mut node = settings;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        node = node
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Unknown setting: {}", key))?;
    }

    match node.as_object_mut() {
        Some(section) if section.contains_key(leaf) => {
            section.insert(leaf.to_string(), value);
            Ok(())
        }
        _ => anyhow::bail!("Unknown setting: {}", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_json_path() {
        let mut json = serde_json::to_value(StmtxConfig::default()).unwrap();
        set_json_path(&mut json, "report.write_json", Value::Bool(true)).unwrap();

        let config: StmtxConfig = serde_json::from_value(json).unwrap();
        assert!(config.report.write_json);
    }

    #[test]
    fn test_set_json_path_rejects_unknown_keys() {
        let mut json = serde_json::to_value(StmtxConfig::default()).unwrap();
        assert!(set_json_path(&mut json, "report.colour", Value::Null).is_err());
        assert!(set_json_path(&mut json, "nope.key", Value::Null).is_err());
    }

    #[test]
    fn test_lookup() {
        let json = serde_json::to_value(StmtxConfig::default()).unwrap();
        assert_eq!(
            lookup(&json, "parser.skip_marker").unwrap(),
            &Value::String("Beginning Balance".to_string())
        );
        assert!(lookup(&json, "parser.missing").is_err());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("ACTIVITY"), Value::String("ACTIVITY".to_string()));
    }

    #[test]
    fn test_update_creates_file_and_rejects_bad_types() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join("config.json");

        update(&file, "discovery.extension", Value::String("PDF".to_string())).unwrap();
        assert_eq!(StmtxConfig::from_file(&file).unwrap().discovery.extension, "PDF");

        assert!(update(&file, "report.write_json", Value::String("yes".to_string())).is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"parser": {"skip_marker": "Opening Balance"}}"#).unwrap();

        let config = load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.parser.skip_marker, "Opening Balance");
        assert_eq!(config.parser.section_marker, "TRANSACTION DETAIL");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        assert!(load(Some("/nonexistent/stmtx.json")).is_err());
    }
}
