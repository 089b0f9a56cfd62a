//! Domain view of an Abaqus deck holding a single fnm part.
//!
//! The deck is split into pass-through sections and the fnm part, whose
//! single-ply mesh, node sets and pre-delamination set are parsed into plain
//! data for the mesh augmentation stages.

pub mod error;
pub mod part;
pub mod sections;
pub mod summary;

pub use error::{ModelError, Result};
pub use part::{ElementSetDef, FnmPart, NodeSetDef, RawElement};
pub use sections::{DeckSections, StepSection};
pub use summary::ModelSummary;
