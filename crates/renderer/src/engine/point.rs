// SPDX-License-Identifier: MIT

//!
//! Points
//!

use serde::Serialize;
use std::fmt::Debug;

pub type Position = Point;

#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}
