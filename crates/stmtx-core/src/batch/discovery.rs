//! Statement file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions, Pattern};
use tracing::{debug, info};

use crate::error::{Result, StmtxError};
use crate::models::config::DiscoveryConfig;
use crate::models::transaction::StatementFile;

/// List statement files directly inside `dir`, matching the extension case-insensitively.
pub fn list_statement_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(extension)
    );
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let paths = glob_with(&pattern, options)
        .map_err(|e| StmtxError::Config(format!("invalid discovery pattern {}: {}", pattern, e)))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    Ok(paths)
}

/// Find the folder holding statements and the statements in it, ordered by statement date.
///
/// When `dir` has no statement files, the first immediate subfolder (by name) that has
/// some is used instead.
pub fn discover_statements(
    dir: &Path,
    config: &DiscoveryConfig,
) -> Result<(PathBuf, Vec<StatementFile>)> {
    let mut folder = dir.to_path_buf();
    let mut paths = list_statement_files(dir, &config.extension)?;

    if paths.is_empty() && config.search_subdirectories {
        let mut subfolders: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_dir())
            .collect();
        subfolders.sort();

        for subfolder in subfolders {
            let found = list_statement_files(&subfolder, &config.extension)?;
            if !found.is_empty() {
                info!("Found statements in subfolder {}", subfolder.display());
                folder = subfolder;
                paths = found;
                break;
            }
        }
    }

    if paths.is_empty() {
        return Err(StmtxError::NoStatements(dir.to_path_buf()));
    }

    let statements = sort_statements(paths.into_iter().map(StatementFile::from_path).collect());
    debug!("Discovered {} statements in {}", statements.len(), folder.display());

    Ok((folder, statements))
}

/// Order statements by statement date, then file name.
pub fn sort_statements(mut statements: Vec<StatementFile>) -> Vec<StatementFile> {
    statements.sort_by(|a, b| {
        a.statement_date
            .cmp(&b.statement_date)
            .then_with(|| a.filename.cmp(&b.filename))
    });
    statements
}
