//! Preprocessing pipeline and writers for floating node method decks.
//!
//! This crate provides:
//! - **Run parameters** behind the [`ParameterSource`] trait, with a JSON-backed
//!   [`PresetParameters`] implementation
//! - **Pipeline** from a parsed deck to the projected laminate model
//! - **Side files** (`fnm_nodes.txt`, `fnm_edges.txt`, `fnm_elems.txt`,
//!   `fnm_predelam.txt`, `fnm_matrix_crack.txt`)
//! - **Augmented deck** (`uel_<job>.inp`) with its `uel_nodes.inp` and
//!   `uel_elems.inp` include files
//! - **JSON run report**

pub mod error;
pub mod fnm_files;
pub mod format;
mod output;
pub mod params;
mod pipeline;
mod report;
pub mod uel_deck;

#[cfg(test)]
mod test_support;

pub use error::{IoError, Result};
pub use output::{OutputBundle, write_output_bundle};
pub use params::{ElementSizeBounds, ParameterSource, PresetParameters, UelSettings};
pub use pipeline::{FnmModel, preprocess, preprocess_file};
pub use report::{LaminateCounts, PlyCounts, RunReport, load_report, save_report};
