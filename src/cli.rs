//! Command-line argument parsing
//!
//! Supports:
//! - Scanning one or more files for path references
//! - Opening the reference at a line/column of the first file
//! - Overriding highlight settings for a single run

use clap::Parser;
use std::path::PathBuf;

use crate::config::HighlightSettings;

/// Underline namespace::dotted.path references and open the files they name
#[derive(Parser, Debug)]
#[command(name = "pathmark", version, about = "Find and open namespace::path references")]
pub struct CliArgs {
    /// Files to scan
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Workspace root used to look up referenced resources
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Open the reference at line N of the first file
    #[arg(long, value_name = "N")]
    pub line: Option<usize>,

    /// Column of the reference to open (used with --line)
    #[arg(long, value_name = "N")]
    pub column: Option<usize>,

    /// Track references without drawing underlines
    #[arg(long)]
    pub no_highlight: bool,

    /// Ignore files with more than N references
    #[arg(long, value_name = "N")]
    pub max_paths: Option<usize>,

    /// Settings file to use instead of the one in the config directory
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub files: Vec<PathBuf>,
    /// Resource lookup root; defaults to the current directory
    pub root: PathBuf,
    /// Cursor in the first file (line, column) - 1-indexed from user, converted to 0-indexed
    pub cursor: Option<(usize, usize)>,
    pub settings: HighlightSettings,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration, with `base`
    /// settings overridden by any flags
    pub fn into_config(self, base: HighlightSettings) -> Result<RunConfig, String> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        if !root.is_dir() {
            return Err(format!("Workspace root {} is not a directory", root.display()));
        }

        if self.column.is_some() && self.line.is_none() {
            return Err("--column requires --line".to_string());
        }

        let cursor = self.line.map(|line| {
            let line_0 = line.saturating_sub(1);
            let col_0 = self.column.unwrap_or(1).saturating_sub(1);
            (line_0, col_0)
        });

        let mut settings = base;
        if self.no_highlight {
            settings.highlight_urls = false;
        }
        if let Some(limit) = self.max_paths {
            settings.max_url_limit = limit;
        }

        Ok(RunConfig {
            files: self.files,
            root,
            cursor,
            settings,
        })
    }
}

/// Byte offset of a 0-indexed (line, character column) position.
///
/// Columns past the end of a line clamp to the line end; lines past the end
/// of the text clamp to the text end.
pub fn offset_for_position(text: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for _ in 0..line {
        match text[line_start..].find('\n') {
            Some(newline) => line_start += newline + 1,
            None => return text.len(),
        }
    }

    let line_text = text[line_start..].split('\n').next().unwrap_or_default();
    let within = line_text
        .char_indices()
        .nth(column)
        .map(|(idx, _)| idx)
        .unwrap_or(line_text.len());

    line_start + within
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(files: &[&str]) -> CliArgs {
        CliArgs {
            files: files.iter().map(PathBuf::from).collect(),
            root: None,
            line: None,
            column: None,
            no_highlight: false,
            max_paths: None,
            settings: None,
        }
    }

    #[test]
    fn test_defaults_keep_base_settings() {
        let config = args(&["routes.php"])
            .into_config(HighlightSettings::default())
            .unwrap();
        assert_eq!(config.settings, HighlightSettings::default());
        assert_eq!(config.root, PathBuf::from("."));
        assert!(config.cursor.is_none());
    }

    #[test]
    fn test_flags_override_settings() {
        let mut cli = args(&["routes.php"]);
        cli.no_highlight = true;
        cli.max_paths = Some(3);
        let config = cli.into_config(HighlightSettings::default()).unwrap();
        assert!(!config.settings.highlight_urls);
        assert_eq!(config.settings.max_url_limit, 3);
    }

    #[test]
    fn test_line_column_conversion() {
        let mut cli = args(&["routes.php"]);
        cli.line = Some(42);
        cli.column = Some(10);
        let config = cli.into_config(HighlightSettings::default()).unwrap();
        // 1-indexed to 0-indexed: line 42 → 41, column 10 → 9
        assert_eq!(config.cursor, Some((41, 9)));
    }

    #[test]
    fn test_line_without_column() {
        let mut cli = args(&["routes.php"]);
        cli.line = Some(10);
        let config = cli.into_config(HighlightSettings::default()).unwrap();
        assert_eq!(config.cursor, Some((9, 0)));
    }

    #[test]
    fn test_column_without_line_is_rejected() {
        let mut cli = args(&["routes.php"]);
        cli.column = Some(4);
        assert!(cli.into_config(HighlightSettings::default()).is_err());
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let mut cli = args(&["routes.php"]);
        cli.root = Some(PathBuf::from("/definitely/not/a/dir"));
        assert!(cli.into_config(HighlightSettings::default()).is_err());
    }

    #[test]
    fn test_offset_for_position() {
        let text = "<?php\nroute('route::users.show');\n";
        assert_eq!(offset_for_position(text, 0, 0), 0);
        assert_eq!(offset_for_position(text, 1, 7), 13);
        assert_eq!(&text[13..30], "route::users.show");
        assert_eq!(offset_for_position(text, 1, 500), text.len() - 1);
        assert_eq!(offset_for_position(text, 9, 0), text.len());
    }

    #[test]
    fn test_offset_counts_characters_not_bytes() {
        let text = "é route::a";
        assert_eq!(offset_for_position(text, 0, 2), 3);
    }
}
