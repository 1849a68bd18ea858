// SPDX-License-Identifier: MIT

//!
//! Frontends that draw resolved card layouts
//!

pub mod desktop_egui;
pub mod pdf;
