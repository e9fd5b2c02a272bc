//! Application configuration
//!
//! Owned by the presentation layer (the CLI). The library core never reads it;
//! it is turned into [`AssemblerOptions`] before a generation.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pdf::assemble::{AssemblerOptions, DEFAULT_CAPTION, DEFAULT_SECTION_HEADER};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory that timestamp-named portfolios are written to
    pub output_dir: PathBuf,
    /// Logo for the top-left corner, relative to the working directory
    pub logo_left: PathBuf,
    /// Logo for the top-right corner, relative to the working directory
    pub logo_right: PathBuf,
    pub title: Option<String>,
    pub author: Option<String>,
    pub section_header: String,
    pub caption: String,
    /// Open each portfolio with the default viewer once written
    pub open_after_generate: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            logo_left: PathBuf::from("assets/logo-left.png"),
            logo_right: PathBuf::from("assets/logo-right.png"),
            title: Some("Photo Portfolio".to_string()),
            author: None,
            section_header: DEFAULT_SECTION_HEADER.to_string(),
            caption: DEFAULT_CAPTION.to_string(),
            open_after_generate: false,
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from the default location when `path` is `None`
    ///
    /// An explicit path must exist. A missing file at the default location
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `<config dir>/photo-portfolio/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("photo-portfolio").join("config.json"))
    }

    /// Options for the assembler, with an optional session date
    pub fn assembler_options(&self, session_date: Option<NaiveDate>) -> AssemblerOptions {
        let mut options = AssemblerOptions::new(&self.logo_left, &self.logo_right);
        options.section_header = self.section_header.clone();
        options.caption = self.caption.clone();
        options.title = self.title.clone();
        options.author = self.author.clone();
        options.session_date = session_date;
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = AppConfig {
            author: Some("Studio".to_string()),
            open_after_generate: true,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "section_header": "Spring Sessions" }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.section_header, "Spring Sessions");
        assert_eq!(config.logo_left, PathBuf::from("assets/logo-left.png"));
        assert_eq!(config.caption, DEFAULT_CAPTION);
    }

    #[test]
    fn test_explicit_missing_file() {
        let result = AppConfig::load(Some(Path::new("no/such/config.json")));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(AppConfig::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_assembler_options() {
        let config = AppConfig {
            section_header: "Header".to_string(),
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 11, 20);
        let options = config.assembler_options(date);

        assert_eq!(options.section_header, "Header");
        assert_eq!(options.logo_right, PathBuf::from("assets/logo-right.png"));
        assert_eq!(options.session_date, date);
    }
}
