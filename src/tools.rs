//! The `filekit` demonstration tools built on the command tree

pub mod filekit;
pub mod filenames;

pub use filekit::{OutputFormat, build_cli};
pub use filenames::{CleanOptions, SourceKind, clean_filename, extract_filenames};
