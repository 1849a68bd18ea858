// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Read & write spells, collections and designs as JSON
//!

use crate::RepositoryError;
use log::{info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use spellcards_core::{CardElement, Collection, DEFAULT_COLLECTION_NAME, DesignConfig, Spell};
use std::fs::{self, File};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Read a file, dropping any lines at the top that begin with "//" (so data
/// files can carry a comment header)
pub fn load_json_strip_leading_comment_lines(path: &Path) -> Result<String, RepositoryError> {
    let file = File::open(path)?;
    let reader = io::BufReader::new(file);

    // Holds the JSON as it's collected
    let mut json_content = String::new();
    let mut in_header = true;

    for line in reader.lines() {
        let line = line?;
        if in_header && line.trim_start().starts_with("//") {
            continue;
        }
        in_header = false;
        json_content.push_str(&line);
        json_content.push('\n');
    }

    Ok(json_content)
}

/// Read and parse a JSON file
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, RepositoryError> {
    let json = load_json_strip_leading_comment_lines(path)?;
    serde_json::from_str(&json).map_err(|source| RepositoryError::InvalidFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a value as pretty JSON, creating parent directories as needed
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), RepositoryError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Load a JSON array of spells.  Records that aren't valid spells (e.g. an
/// unknown school) are skipped with a warning; the file itself must be a JSON
/// array.
pub fn load_spells(path: &Path) -> Result<Vec<Spell>, RepositoryError> {
    let records: Vec<Value> = read_json(path)?;
    let record_count = records.len();
    let spells: Vec<Spell> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Spell>(record) {
            Ok(spell) => Some(spell),
            Err(error) => {
                warn!(
                    "Skipping spell record {index} in {}: {error}",
                    path.display()
                );
                None
            }
        })
        .collect();
    info!(
        "Loaded {} of {record_count} spells from {}",
        spells.len(),
        path.display()
    );
    Ok(spells)
}

/// Load a JSON array of spells, treating a missing file as empty
pub fn load_spells_if_exists(path: &Path) -> Result<Vec<Spell>, RepositoryError> {
    if !path.exists() {
        info!("No spell file at {}", path.display());
        return Ok(Vec::new());
    }
    load_spells(path)
}

/// Save spells as a JSON array
pub fn save_spells(path: &Path, spells: &[Spell]) -> Result<(), RepositoryError> {
    write_json(path, spells)?;
    info!("Saved {} spells to {}", spells.len(), path.display());
    Ok(())
}

/// Load a collection.  The collection is named after the file (without its
/// extension).
pub fn load_collection(path: &Path) -> Result<Collection, RepositoryError> {
    let spells = load_spells(path)?;
    let name = collection_name_from_path(path);
    let collection = Collection::from_spells(name, spells);
    info!(
        "Loaded collection {:?} ({} spells)",
        collection.name(),
        collection.len()
    );
    Ok(collection)
}

/// Load a collection, or an empty one (named after the file) if the file is
/// missing
pub fn load_collection_if_exists(path: &Path) -> Result<Collection, RepositoryError> {
    if !path.exists() {
        return Ok(Collection::new(collection_name_from_path(path)));
    }
    load_collection(path)
}

/// Save a collection as a JSON array of spells
pub fn save_collection(path: &Path, collection: &Collection) -> Result<(), RepositoryError> {
    save_spells(path, collection.spells())
}

/// The name of a collection stored at the path
pub fn collection_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string())
}

/// Load a design
pub fn load_design(path: &Path) -> Result<DesignConfig, RepositoryError> {
    let design: DesignConfig = read_json(path)?;
    info!(
        "Loaded design from {} ({} elements)",
        path.display(),
        design.len()
    );
    Ok(design)
}

/// Load a design, falling back to the built-in design if the file is missing
/// or invalid
pub fn load_design_or_default(path: &Path) -> DesignConfig {
    if !path.exists() {
        info!("No design at {}, using the built-in design", path.display());
        return DesignConfig::default();
    }
    load_design(path).unwrap_or_else(|error| {
        warn!("Unable to load design ({error}), using the built-in design");
        DesignConfig::default()
    })
}

/// Save a design
pub fn save_design(path: &Path, design: &DesignConfig) -> Result<(), RepositoryError> {
    write_json(path, design)?;
    info!("Design saved to {}", path.display());
    Ok(())
}

/// Check that an element name is one cards are drawn with
fn known_element(element: &str) -> Result<CardElement, RepositoryError> {
    CardElement::from_str(element.trim())
        .map_err(|_| RepositoryError::UnknownElement(element.to_string()))
}

/// Set one option of an element in the design file and save it.  A missing
/// design file starts from the built-in design.  Returns the saved design.
pub fn set_design_option(
    path: &Path,
    element: &str,
    option: &str,
    value: &str,
) -> Result<DesignConfig, RepositoryError> {
    let element = known_element(element)?;
    let mut design = load_design_or_default(path);
    design.element_mut(element.key()).set_from_str(option.trim(), value);
    save_design(path, &design)?;
    info!("Set {element}.{option} = {value:?}");
    Ok(design)
}

/// Remove one option of an element (so it falls back to its default), or the
/// whole element if no option is given (so it isn't drawn), and save the
/// design.  Returns the saved design.
pub fn unset_design_option(
    path: &Path,
    element: &str,
    option: Option<&str>,
) -> Result<DesignConfig, RepositoryError> {
    let element = known_element(element)?;
    let mut design = load_design_or_default(path);
    match option {
        Some(option) => {
            if design.element(element).is_some() {
                design.element_mut(element.key()).remove(option.trim());
            }
            info!("Unset {element}.{option}");
        }
        None => {
            design.remove_element(element.key());
            info!("Removed {element} from the design");
        }
    }
    save_design(path, &design)?;
    Ok(design)
}

/// Save a design in the directory under the name, returning the path written
/// (`<dir>/<name>.json`)
pub fn save_design_as(
    dir: &Path,
    name: &str,
    design: &DesignConfig,
) -> Result<PathBuf, RepositoryError> {
    let name = name.trim().trim_end_matches(".json");
    let path = dir.join(format!("{name}.json"));
    save_design(&path, design)?;
    Ok(path)
}
