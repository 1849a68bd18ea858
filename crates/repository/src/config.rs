// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Spell card config (where the data files live)
//!

use crate::RepositoryError;
use directories_next::ProjectDirs;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const PROJECT_QUALIFIER: &str = "org";
const ORG_NAME: &str = "SpellCards";
const APPLICATION_NAME: &str = "SpellCards";
const CONFIG_FILE_NAME: &str = "config.json";

const CORE_SPELLS_FILE_NAME: &str = "spells.json";
const CUSTOM_SPELLS_FILE_NAME: &str = "custom_spells.json";
const PREVIEW_SPELLS_FILE_NAME: &str = "preview_spells.json";
const DESIGN_FILE_NAME: &str = "design.json";
const COLLECTIONS_DIR_NAME: &str = "collections";
const DESIGNS_DIR_NAME: &str = "designs";
const ASSETS_DIR_NAME: &str = "assets";
const OUTPUT_DIR_NAME: &str = "output";

/// The default backside printed behind each page of cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BacksideChoice {
    /// No backside pages
    #[default]
    None,

    /// The bundled backdrop image (in the assets directory)
    Preset,

    /// An image chosen by the user
    Custom,
}

impl fmt::Display for BacksideChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BacksideChoice::None => "none",
            BacksideChoice::Preset => "preset",
            BacksideChoice::Custom => "custom",
        };
        write!(f, "{name}")
    }
}

impl FromStr for BacksideChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(BacksideChoice::None),
            "preset" => Ok(BacksideChoice::Preset),
            "custom" => Ok(BacksideChoice::Custom),
            other => Err(format!("unknown backside option: {other}")),
        }
    }
}

/// The config that's saved to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The built-in spell list
    pub core_spells_path: PathBuf,

    /// User-authored spells
    pub custom_spells_path: PathBuf,

    /// Spells shown by the preview window
    pub preview_spells_path: PathBuf,

    /// The active design
    pub design_path: PathBuf,

    /// Where collections are kept
    pub collections_dir: PathBuf,

    /// Where designs are saved with `save_design_as`
    pub designs_dir: PathBuf,

    /// Icons & backdrop images
    pub assets_dir: PathBuf,

    /// Where exported PDFs are written
    pub output_dir: PathBuf,

    /// The default backside
    #[serde(default)]
    pub backside: BacksideChoice,

    /// The image used when the backside is [`BacksideChoice::Custom`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backside_image: Option<PathBuf>,

    /// Whether exports have cut marks by default
    #[serde(default)]
    pub cut_marks: bool,
}

impl Config {
    /// A config with every file inside one base directory
    pub fn in_dir(base: &Path) -> Self {
        Config {
            core_spells_path: base.join(CORE_SPELLS_FILE_NAME),
            custom_spells_path: base.join(CUSTOM_SPELLS_FILE_NAME),
            preview_spells_path: base.join(PREVIEW_SPELLS_FILE_NAME),
            design_path: base.join(DESIGN_FILE_NAME),
            collections_dir: base.join(COLLECTIONS_DIR_NAME),
            designs_dir: base.join(DESIGNS_DIR_NAME),
            assets_dir: base.join(ASSETS_DIR_NAME),
            output_dir: base.join(OUTPUT_DIR_NAME),
            backside: BacksideChoice::None,
            backside_image: None,
            cut_marks: false,
        }
    }

    /// Load the config from a file
    pub fn load_from_path(path: &Path) -> Result<Self, RepositoryError> {
        info!("Loading config from {path:?}");
        let data = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&data)?;
        info!("Config loaded = {config:?}");
        Ok(config)
    }

    /// Load the config, creating it with defaults first if it doesn't exist
    pub fn ensure_setup() -> Result<Self, RepositoryError> {
        info!("Ensuring config exists");
        let path = config_file_path()?;
        if !path.exists() {
            info!("No config file found");
            let new_config = default_config()?;
            new_config.save_to_path(&path)?;
            info!("Config created = {new_config:?}");
            return Ok(new_config);
        }
        Self::load_from_path(&path)
    }

    /// Save the config to a file
    pub fn save_to_path(&self, path: &Path) -> Result<(), RepositoryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        info!("Saving config to {path:?}");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Config saved");
        Ok(())
    }

    /// The path of the collection with the given name
    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.collections_dir.join(format!("{name}.json"))
    }
}

/// Get the default config (all files in the platform data directory)
fn default_config() -> Result<Config, RepositoryError> {
    info!("Creating default config");
    let dirs = project_dirs()?;
    Ok(Config::in_dir(dirs.data_dir()))
}

/// Get the project directories (e.g. where the config is stored)
#[cfg(debug_assertions)]
fn project_dirs() -> Result<ProjectDirs, RepositoryError> {
    info!("Getting project directories (dev build)");
    ProjectDirs::from(
        PROJECT_QUALIFIER,
        ORG_NAME,
        &format!("{APPLICATION_NAME} Dev"),
    )
    .ok_or(RepositoryError::Config)
}

/// Get the project directories (e.g. where the config is stored)
#[cfg(not(debug_assertions))]
fn project_dirs() -> Result<ProjectDirs, RepositoryError> {
    info!("Getting project directories");
    ProjectDirs::from(PROJECT_QUALIFIER, ORG_NAME, APPLICATION_NAME)
        .ok_or(RepositoryError::Config)
}

/// Get the path to the config
pub fn config_file_path() -> Result<PathBuf, RepositoryError> {
    let config_file = project_dirs()?
        .config_dir()
        .to_path_buf()
        .join(CONFIG_FILE_NAME);
    info!("Config file path = {config_file:?}");
    Ok(config_file)
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn save_and_load() {
        let dir = TempDir::new("spellcards").unwrap();
        let mut config = Config::in_dir(dir.path());
        config.backside = BacksideChoice::Custom;
        config.backside_image = Some(dir.path().join("back.png"));
        let path = dir.path().join("nested/config.json");
        config.save_to_path(&path).unwrap();
        assert_eq!(Config::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn backside_choice_from_str() {
        assert_eq!("Preset".parse::<BacksideChoice>(), Ok(BacksideChoice::Preset));
        assert!("back".parse::<BacksideChoice>().is_err());
    }

    #[test]
    fn missing_fields_default() {
        let json = r#"{
            "core_spells_path": "a", "custom_spells_path": "b",
            "preview_spells_path": "c", "design_path": "d",
            "collections_dir": "e", "designs_dir": "f",
            "assets_dir": "g", "output_dir": "h"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.backside, BacksideChoice::None);
        assert!(!config.cut_marks);
    }
}
