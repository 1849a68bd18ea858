// SPDX-License-Identifier: MIT

//!
//! *Part of the wider spell cards project*
//!
//! This crate defines the basic datatypes used across the spell cards project
//! (repository, renderer, command line tools):
//!
//! - Spells, and the pieces they're made of (level, school, components, damage
//!   dice)
//! - Collections of spells selected for export
//! - Card designs (per-element layout and style configuration)
//!
//! As with the rest of the project, the aim is that if a type is instantiated,
//! it's valid.
//!

mod collection;
mod damage;
mod design;
mod level;
mod name;
mod school;
mod spell;

pub use collection::*;
pub use damage::*;
pub use design::*;
pub use level::*;
pub use name::*;
pub use school::*;
pub use spell::*;
