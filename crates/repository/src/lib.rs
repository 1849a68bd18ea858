// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! *Part of the wider SpellCards project*
//!
//! This library crate is responsible for all spell card data on disk.  It does
//! the following:
//!
//! - Loads the built-in and user-authored spell lists and merges them
//! - Filters & searches spells
//! - Saves user-authored spells
//! - Loads & saves collections (the spells chosen for export)
//! - Loads & saves card designs
//! - Manages the application config (where the files live)
//!
//! This crate makes use of the basic SpellCards `core` crate for primitive
//! types, and is itself used by the binaries.
//!

mod config;
mod error;
mod files;
mod repository;

pub use config::*;
pub use error::*;
pub use files::*;
pub use repository::*;
