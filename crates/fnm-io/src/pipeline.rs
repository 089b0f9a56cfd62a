//! Deck-to-laminate pipeline: sections, topology, layup, expansion, projection.

use std::path::Path;

use fnm_inp::Deck;
use fnm_mesh::{
    Laminate, Layup, PredelamSet, ProjectedNodeSet, Topology, TopologyBuilder, project_node_set,
    project_predelam,
};
use fnm_model::DeckSections;
use tracing::{debug, info, warn};

use crate::error::{IoError, Result};
use crate::params::{ElementSizeBounds, ParameterSource};

/// Everything the emitters need, built in one pass before any file is written.
#[derive(Debug, Clone)]
pub struct FnmModel {
    pub sections: DeckSections,
    pub topology: Topology,
    pub layup: Layup,
    pub laminate: Laminate,
    pub node_sets: Vec<ProjectedNodeSet>,
    pub predelam: Option<PredelamSet>,
    pub element_sizes: ElementSizeBounds,
}

impl FnmModel {
    pub fn part_name(&self) -> &str {
        &self.sections.fnm_part.name
    }

    pub fn tie_sets(&self) -> impl Iterator<Item = &ProjectedNodeSet> {
        self.node_sets.iter().filter(|set| set.tie)
    }
}

pub fn preprocess_file<S>(path: impl AsRef<Path>, source: &mut S) -> Result<FnmModel>
where
    S: ParameterSource + ?Sized,
{
    let deck = Deck::parse_file(path)?;
    preprocess(&deck, source)
}

pub fn preprocess<S>(deck: &Deck, source: &mut S) -> Result<FnmModel>
where
    S: ParameterSource + ?Sized,
{
    let sections = DeckSections::extract(deck)?;
    let part = &sections.fnm_part;
    info!(
        "fnm part '{}': {} nodes, {} elements, {} node sets",
        part.name,
        part.nodes.len(),
        part.elements.len(),
        part.node_sets.len()
    );
    if let Some(element_type) = &part.element_type {
        debug!("fnm part element type {element_type}");
    }

    let topology = TopologyBuilder::build(&part.nodes, &part.elements)?;
    info!(
        "single-ply topology: {} edges, {} nodes per ply",
        topology.edges_per_ply(),
        topology.nodes_per_ply()
    );

    let layup = source.layup()?;
    info!(
        "layup: {} ply-blocks, {} interfaces, total thickness {}",
        layup.block_count(),
        layup.interface_count(),
        layup.total_thickness()
    );

    let interface = match &part.predelam {
        Some(_) if layup.interface_count() == 0 => {
            return Err(IoError::invalid_parameter(
                "a pre-delamination set needs at least two ply-blocks",
            ));
        }
        Some(_) => Some(source.predelam_interface(layup.interface_count())?),
        None => None,
    };

    let measured = topology.edge_length_range();
    let element_sizes = source.element_size_bounds(measured)?;
    if let Some(range) = measured
        && !element_sizes.brackets(range)
    {
        warn!(
            "element size bounds [{}, {}] do not cover measured edge lengths [{}, {}]",
            element_sizes.min, element_sizes.max, range.0, range.1
        );
    }

    let laminate = Laminate::expand(&topology, &layup);
    info!(
        "laminate: {} nodes, {} edges, {} nodes per element",
        laminate.node_count(),
        laminate.edge_count(),
        laminate.nodes_per_element()
    );

    let node_sets = part
        .node_sets
        .iter()
        .map(|set| project_node_set(set, &topology, &layup))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let predelam = match (&part.predelam, interface) {
        (Some(set), Some(interface)) => {
            let projected = project_predelam(set, interface, &topology, &layup)?;
            info!(
                "pre-delamination: {} elements on interface {}",
                projected.elements.len(),
                projected.interface
            );
            Some(projected)
        }
        _ => None,
    };

    Ok(FnmModel {
        sections,
        topology,
        layup,
        laminate,
        node_sets,
        predelam,
        element_sizes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TWO_BRICKS, preset, two_brick_model};
    use fnm_mesh::PlyRange;
    use fnm_model::ModelError;

    #[test]
    fn two_bricks_expand_through_two_blocks() {
        let model = two_brick_model();
        assert_eq!(model.part_name(), "fnm-plate");
        assert_eq!(model.topology.edges_per_ply(), 14);
        assert_eq!(model.topology.nodes_per_ply(), 40);
        assert_eq!(model.laminate.node_count(), 94);
        assert_eq!(model.laminate.edge_count(), 28);
        assert_eq!(model.laminate.nodes_per_element(), 56);
        assert_eq!(model.laminate.edges_per_element(), 16);
    }

    #[test]
    fn node_sets_are_projected_in_deck_order() {
        let model = two_brick_model();
        let names: Vec<&str> = model.node_sets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["tie-bottom", "left"]);

        let tie = &model.node_sets[0];
        assert!(tie.tie);
        assert_eq!(tie.range, PlyRange::Bottom);
        assert_eq!(tie.edge_ids().collect::<Vec<_>>(), vec![1, 4, 9, 2, 10, 3, 11]);

        let left = &model.node_sets[1];
        assert_eq!(left.range, PlyRange::All);
        assert_eq!(left.plies[0].floating_pairs, vec![[19, 20], [27, 28]]);
        assert_eq!(left.plies[1].real_nodes, vec![41, 44, 47, 50]);
        assert_eq!(model.tie_sets().count(), 1);
    }

    #[test]
    fn predelam_interface_comes_from_the_source() {
        let model = two_brick_model();
        let predelam = model.predelam.expect("deck has a predelam set");
        assert_eq!(predelam.elements, vec![2]);
        assert_eq!(predelam.interface, 1);
    }

    #[test]
    fn predelam_on_a_single_block_is_rejected() {
        let deck = Deck::parse_str(TWO_BRICKS).expect("deck parses");
        let mut params = preset();
        params.layup.angles = vec![0.0, 0.0];
        let err = preprocess(&deck, &mut params).expect_err("one block has no interface");
        assert!(matches!(err, IoError::InvalidParameter(_)));
    }

    #[test]
    fn structural_errors_surface_as_model_errors() {
        let src = TWO_BRICKS.replace("*Assembly, name=Assembly\n", "");
        let deck = Deck::parse_str(&src).expect("deck parses");
        let err = preprocess(&deck, &mut preset()).expect_err("missing assembly");
        assert!(matches!(err, IoError::Model(ModelError::AssemblyCount(0))));
    }
}
