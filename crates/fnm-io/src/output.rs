use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::fnm_files::{render_edges, render_elems, render_matrix_crack, render_nodes, render_predelam};
use crate::params::UelSettings;
use crate::pipeline::FnmModel;
use crate::uel_deck::{UEL_ELEMS_FILE, UEL_NODES_FILE, render_deck, render_uel_elems, render_uel_nodes};

/// Paths of every file written for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBundle {
    pub deck_path: PathBuf,
    pub uel_nodes_path: PathBuf,
    pub uel_elems_path: PathBuf,
    pub nodes_path: PathBuf,
    pub edges_path: PathBuf,
    pub elems_path: PathBuf,
    pub predelam_path: PathBuf,
    pub matrix_crack_path: PathBuf,
}

impl OutputBundle {
    pub fn new(dir: impl AsRef<Path>, job_name: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            deck_path: dir.join(format!("uel_{job_name}.inp")),
            uel_nodes_path: dir.join(UEL_NODES_FILE),
            uel_elems_path: dir.join(UEL_ELEMS_FILE),
            nodes_path: dir.join("fnm_nodes.txt"),
            edges_path: dir.join("fnm_edges.txt"),
            elems_path: dir.join("fnm_elems.txt"),
            predelam_path: dir.join("fnm_predelam.txt"),
            matrix_crack_path: dir.join("fnm_matrix_crack.txt"),
        }
    }

    pub fn paths(&self) -> [&Path; 8] {
        [
            &self.deck_path,
            &self.uel_nodes_path,
            &self.uel_elems_path,
            &self.nodes_path,
            &self.edges_path,
            &self.elems_path,
            &self.predelam_path,
            &self.matrix_crack_path,
        ]
    }
}

/// Render every output of `model` and write it under `dir`.
///
/// All contents are rendered before the first file is created.
pub fn write_output_bundle(
    dir: impl AsRef<Path>,
    job_name: &str,
    model: &FnmModel,
    settings: &UelSettings,
) -> io::Result<OutputBundle> {
    let dir = dir.as_ref();
    let bundle = OutputBundle::new(dir, job_name);

    let contents = [
        render_deck(&model.sections, &model.laminate, &model.node_sets, settings),
        render_uel_nodes(&model.laminate),
        render_uel_elems(&model.laminate, settings),
        render_nodes(&model.laminate),
        render_edges(&model.laminate, model.tie_sets()),
        render_elems(&model.laminate),
        render_predelam(model.predelam.as_ref()),
        render_matrix_crack(&model.laminate, &model.element_sizes),
    ];

    fs::create_dir_all(dir)?;
    for (path, body) in bundle.paths().into_iter().zip(contents) {
        write_text(path, &body)?;
        debug!("wrote {} ({} bytes)", path.display(), body.len());
    }
    info!("wrote {} files to {}", bundle.paths().len(), dir.display());
    Ok(bundle)
}

fn write_text(path: &Path, body: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, body)
}

pub(crate) fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::two_brick_model;

    #[test]
    fn writes_every_file_of_the_bundle() {
        let root = tempfile::tempdir().expect("temp dir");
        let model = two_brick_model();
        let out = write_output_bundle(root.path().join("out"), "bricks", &model, &UelSettings::default())
            .expect("bundle should write");

        for path in out.paths() {
            assert!(path.exists(), "{} missing", path.display());
        }
        assert!(out.deck_path.ends_with("uel_bricks.inp"));

        let predelam = fs::read_to_string(&out.predelam_path).expect("readable");
        assert_eq!(predelam, "1\n1\n2\n");
        let deck = fs::read_to_string(&out.deck_path).expect("readable");
        assert!(deck.contains("*NODE,INPUT=uel_nodes.inp\n"));
    }

    #[test]
    fn bundle_paths_follow_job_name() {
        let bundle = OutputBundle::new("run", "plate");
        assert_eq!(bundle.deck_path, PathBuf::from("run/uel_plate.inp"));
        assert_eq!(bundle.matrix_crack_path, PathBuf::from("run/fnm_matrix_crack.txt"));
    }
}
