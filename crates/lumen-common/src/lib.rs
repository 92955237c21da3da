//! # Lumen Common
//!
//! Common types shared by every Lumen crate:
//! - Colour values (`Rgb`) with hex parsing and brightness scaling
//! - Icon identifiers (`IconId`, `IconRef`)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
