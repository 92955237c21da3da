//! # Lumen Library
//!
//! Persistence side of Lumen:
//! - Icon records and their lenient wire format
//! - The `IconStore` trait with in-memory and HTTP implementations
//! - The `IconLibrary` client mapping editor sessions to records
//! - Local draft persistence of the frames being edited
//!
//! Store calls are async. Library operations borrow the editor session only
//! for the synchronous part (snapshot or load), never across a store call.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod draft;
pub mod http;
pub mod library;
pub mod record;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::draft::*;
    pub use crate::http::*;
    pub use crate::library::*;
    pub use crate::record::*;
    pub use crate::store::*;
}

pub use prelude::*;
