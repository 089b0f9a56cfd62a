//! Run parameters that are not part of the deck.
//!
//! The pipeline asks a [`ParameterSource`] for them, so the same code runs
//! from interactive prompts or from a JSON parameter file.

use std::fs;
use std::path::Path;

use fnm_mesh::{Layup, LayupSpec};
use serde::{Deserialize, Serialize};

use crate::error::{IoError, Result};

/// Smallest and largest element edge length allowed for matrix cracks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementSizeBounds {
    pub min: f64,
    pub max: f64,
}

impl ElementSizeBounds {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && min > 0.0) {
            return Err(IoError::invalid_parameter(format!(
                "minimum element size must be a positive number, got {min}"
            )));
        }
        if !(max.is_finite() && max >= min) {
            return Err(IoError::invalid_parameter(format!(
                "maximum element size must be at least the minimum ({min}), got {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Whether the bounds cover every measured edge length.
    pub fn brackets(&self, measured: (f64, f64)) -> bool {
        self.min <= measured.0 && measured.1 <= self.max
    }
}

/// Constants of the user-element definition written into the augmented deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UelSettings {
    /// Numeric part of the user element type (`U308`)
    pub type_code: u32,
    pub coordinates: u32,
    pub properties: u32,
    pub variables: u32,
    /// Maximum entries on an `*Element`/`*Nset` data line
    pub entries_per_line: usize,
    /// Data lines are kept shorter than this many characters
    pub line_length: usize,
}

impl Default for UelSettings {
    fn default() -> Self {
        Self {
            type_code: 308,
            coordinates: 3,
            properties: 1,
            variables: 1,
            entries_per_line: 14,
            line_length: 70,
        }
    }
}

impl UelSettings {
    pub fn element_type(&self) -> String {
        format!("U{}", self.type_code)
    }
}

/// Supplies the parameters the deck does not carry.
pub trait ParameterSource {
    fn layup(&mut self) -> Result<Layup>;

    /// 1-based pre-delamination interface, in `1..=interfaces`.
    fn predelam_interface(&mut self, interfaces: usize) -> Result<usize>;

    /// `measured` is the shortest and longest edge of the mesh, when known.
    fn element_size_bounds(&mut self, measured: Option<(f64, f64)>) -> Result<ElementSizeBounds>;
}

/// Parameters read from a JSON file; invalid values are errors, never re-asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetParameters {
    #[serde(flatten)]
    pub layup: LayupSpec,
    #[serde(default)]
    pub predelam_interface: Option<usize>,
    pub min_element_size: f64,
    pub max_element_size: f64,
    #[serde(default)]
    pub uel: UelSettings,
}

impl PresetParameters {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ParameterSource for PresetParameters {
    fn layup(&mut self) -> Result<Layup> {
        Ok(Layup::from_spec(&self.layup)?)
    }

    fn predelam_interface(&mut self, interfaces: usize) -> Result<usize> {
        match self.predelam_interface {
            Some(interface) if (1..=interfaces).contains(&interface) => Ok(interface),
            Some(interface) => Err(IoError::invalid_parameter(format!(
                "predelam_interface {interface} must lie in 1..={interfaces}"
            ))),
            None => Err(IoError::invalid_parameter(
                "the fnm part has a predelam element set but predelam_interface is not given",
            )),
        }
    }

    fn element_size_bounds(&mut self, _measured: Option<(f64, f64)>) -> Result<ElementSizeBounds> {
        ElementSizeBounds::new(self.min_element_size, self.max_element_size)
    }
}
