use std::fs;
use std::io;
use std::path::Path;

use fnm_mesh::PlyBlock;
use serde::{Deserialize, Serialize};

use crate::output::{OutputBundle, ensure_parent_dir};
use crate::params::ElementSizeBounds;
use crate::pipeline::FnmModel;

/// JSON summary of one preprocessing run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub schema_version: u32,
    pub job_name: String,
    pub created_at: String,
    pub part_name: String,
    pub symmetric: bool,
    pub layup: Vec<PlyBlock>,
    pub ply: PlyCounts,
    pub laminate: LaminateCounts,
    pub node_sets: Vec<String>,
    pub predelam_interface: Option<usize>,
    pub element_sizes: ElementSizeBounds,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlyCounts {
    pub real_nodes: usize,
    pub nodes: usize,
    pub edges: usize,
    pub elements: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaminateCounts {
    pub nodes: usize,
    pub edges: usize,
    pub nodes_per_element: usize,
    pub edges_per_element: usize,
}

impl RunReport {
    pub fn new(
        job_name: impl Into<String>,
        created_at: impl Into<String>,
        model: &FnmModel,
        bundle: &OutputBundle,
    ) -> Self {
        let topology = &model.topology;
        let laminate = &model.laminate;
        Self {
            schema_version: 1,
            job_name: job_name.into(),
            created_at: created_at.into(),
            part_name: model.part_name().to_string(),
            symmetric: model.layup.is_symmetric(),
            layup: model.layup.blocks().to_vec(),
            ply: PlyCounts {
                real_nodes: topology.real_node_count(),
                nodes: topology.nodes_per_ply(),
                edges: topology.edges_per_ply(),
                elements: topology.elements().len(),
            },
            laminate: LaminateCounts {
                nodes: laminate.node_count(),
                edges: laminate.edge_count(),
                nodes_per_element: laminate.nodes_per_element(),
                edges_per_element: laminate.edges_per_element(),
            },
            node_sets: model.node_sets.iter().map(|set| set.name.clone()).collect(),
            predelam_interface: model.predelam.as_ref().map(|set| set.interface),
            element_sizes: model.element_sizes,
            files: bundle
                .paths()
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
        }
    }
}

pub fn save_report(path: impl AsRef<Path>, report: &RunReport) -> io::Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let bytes = serde_json::to_vec_pretty(report)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    fs::write(path, bytes)
}

pub fn load_report(path: impl AsRef<Path>) -> io::Result<RunReport> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::two_brick_model;

    #[test]
    fn report_captures_counts_and_survives_reload() {
        let root = tempfile::tempdir().expect("temp dir");
        let model = two_brick_model();
        let bundle = OutputBundle::new(root.path(), "bricks");
        let report = RunReport::new("bricks", "2026-01-01T00:00:00Z", &model, &bundle);

        assert_eq!(report.ply.real_nodes, 12);
        assert_eq!(report.ply.edges, 14);
        assert_eq!(report.laminate.nodes, 94);
        assert_eq!(report.layup.len(), 2);
        assert_eq!(report.predelam_interface, Some(1));
        assert_eq!(report.files.len(), 8);

        let path = root.path().join("nested").join("fnm_report.json");
        save_report(&path, &report).expect("save should succeed");
        let loaded = load_report(&path).expect("load should succeed");
        assert_eq!(loaded, report);
    }

    #[test]
    fn load_report_fails_for_missing_file() {
        let root = tempfile::tempdir().expect("temp dir");
        let err = load_report(root.path().join("missing.json")).expect_err("missing file should fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn load_report_rejects_malformed_json() {
        let root = tempfile::tempdir().expect("temp dir");
        let path = root.path().join("bad.json");
        fs::write(&path, "{not json").expect("write should succeed");
        let err = load_report(&path).expect_err("malformed json should fail");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
