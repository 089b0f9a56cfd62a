//! Laminate layup as a bottom-to-top stack of ply-blocks.

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};

/// A run of consecutive plies sharing one fibre angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlyBlock {
    pub angle: f64,
    pub plies: usize,
    pub thickness: f64,
}

/// Layup as entered by the user: one angle per ply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayupSpec {
    /// The mesh models half of a laminate symmetric about its mid-plane
    #[serde(default)]
    pub symmetric: bool,
    /// Fibre angles from the bottom ply up to the top (or mid-plane) ply
    pub angles: Vec<f64>,
    /// Thickness of a single ply
    pub ply_thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layup {
    blocks: Vec<PlyBlock>,
    symmetric: bool,
}

impl Layup {
    /// Merge runs of equal angles into ply-blocks.
    ///
    /// For a symmetric half-laminate the ply count of the last block is
    /// doubled, since that block straddles the mid-plane. Its thickness is
    /// left as meshed.
    pub fn from_angles(angles: &[f64], ply_thickness: f64, symmetric: bool) -> Result<Self> {
        if angles.is_empty() {
            return Err(MeshError::InvalidLayup("at least one ply angle is required".to_string()));
        }
        if let Some(bad) = angles.iter().find(|a| !a.is_finite()) {
            return Err(MeshError::InvalidLayup(format!("ply angle {bad} is not a number")));
        }
        if !(ply_thickness.is_finite() && ply_thickness > 0.0) {
            return Err(MeshError::InvalidLayup(format!(
                "ply thickness must be a positive number, got {ply_thickness}"
            )));
        }

        let mut blocks: Vec<PlyBlock> = Vec::new();
        for &angle in angles {
            match blocks.last_mut() {
                Some(block) if block.angle == angle => {
                    block.plies += 1;
                    block.thickness += ply_thickness;
                }
                _ => blocks.push(PlyBlock {
                    angle,
                    plies: 1,
                    thickness: ply_thickness,
                }),
            }
        }

        if symmetric && let Some(last) = blocks.last_mut() {
            last.plies *= 2;
        }

        Ok(Self { blocks, symmetric })
    }

    pub fn from_spec(spec: &LayupSpec) -> Result<Self> {
        Self::from_angles(&spec.angles, spec.ply_thickness, spec.symmetric)
    }

    pub fn blocks(&self) -> &[PlyBlock] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of interfaces between adjacent ply-blocks.
    pub fn interface_count(&self) -> usize {
        self.blocks.len().saturating_sub(1)
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Height of the bottom face of block `block`.
    pub fn z_bottom(&self, block: usize) -> f64 {
        self.blocks[..block].iter().fold(0.0, |z, b| z + b.thickness)
    }

    /// Height of the top face of block `block`.
    pub fn z_top(&self, block: usize) -> f64 {
        self.z_bottom(block) + self.blocks[block].thickness
    }

    pub fn total_thickness(&self) -> f64 {
        self.blocks.iter().fold(0.0, |z, b| z + b.thickness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(layup: &Layup) -> Vec<(f64, usize)> {
        layup.blocks().iter().map(|b| (b.angle, b.plies)).collect()
    }

    #[test]
    fn merges_equal_neighbouring_angles() {
        let layup = Layup::from_angles(&[0.0, 0.0, 90.0, 90.0], 0.125, false).expect("valid layup");
        assert_eq!(summary(&layup), vec![(0.0, 2), (90.0, 2)]);
        assert_eq!(layup.interface_count(), 1);
        assert!((layup.blocks()[1].thickness - 0.25).abs() < 1e-12);
    }

    #[test]
    fn symmetric_layup_doubles_last_block_only() {
        let layup = Layup::from_angles(&[0.0, 0.0, 90.0, 90.0], 0.125, true).expect("valid layup");
        assert_eq!(summary(&layup), vec![(0.0, 2), (90.0, 4)]);
        assert!((layup.blocks()[1].thickness - 0.25).abs() < 1e-12);
        assert!(layup.is_symmetric());
    }

    #[test]
    fn separated_equal_angles_stay_separate_blocks() {
        let layup = Layup::from_angles(&[45.0, -45.0, 45.0], 0.2, false).expect("valid layup");
        assert_eq!(summary(&layup), vec![(45.0, 1), (-45.0, 1), (45.0, 1)]);
    }

    #[test]
    fn single_ply_symmetric_layup() {
        let layup = Layup::from_angles(&[30.0], 0.1, true).expect("valid layup");
        assert_eq!(summary(&layup), vec![(30.0, 2)]);
        assert_eq!(layup.interface_count(), 0);
    }

    #[test]
    fn cumulative_heights() {
        let layup = Layup::from_angles(&[0.0, 90.0, 90.0, 0.0], 0.5, false).expect("valid layup");
        assert_eq!(layup.z_bottom(0), 0.0);
        assert!(layup.z_bottom(0).is_sign_positive());
        assert_eq!(layup.z_top(0), 0.5);
        assert_eq!(layup.z_bottom(1), 0.5);
        assert_eq!(layup.z_top(1), 1.5);
        assert_eq!(layup.z_top(2), 2.0);
        assert_eq!(layup.total_thickness(), 2.0);
    }

    #[test]
    fn rejects_empty_angles_and_bad_thickness() {
        assert!(matches!(
            Layup::from_angles(&[], 0.1, false),
            Err(MeshError::InvalidLayup(_))
        ));
        assert!(matches!(
            Layup::from_angles(&[0.0], 0.0, false),
            Err(MeshError::InvalidLayup(_))
        ));
        assert!(matches!(
            Layup::from_angles(&[f64::NAN], 0.1, false),
            Err(MeshError::InvalidLayup(_))
        ));
    }

    #[test]
    fn spec_deserializes_from_json() {
        let spec: LayupSpec =
            serde_json::from_str(r#"{"angles": [0, 45, -45, 90], "ply_thickness": 0.125}"#)
                .expect("valid json");
        assert!(!spec.symmetric);
        let layup = Layup::from_spec(&spec).expect("valid layup");
        assert_eq!(layup.block_count(), 4);
    }
}
