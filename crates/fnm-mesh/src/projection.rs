//! Projection of single-ply node and element sets onto the laminate numbering.

use std::ops::Range;

use fnm_model::{ElementSetDef, NodeSetDef};
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::laminate::StackIndex;
use crate::layup::Layup;
use crate::topology::Topology;

/// Ply-blocks a node set is replicated onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyRange {
    /// Every member lies on the bottom face: first block only
    Bottom,
    /// Every member lies on the top face: last block only
    Top,
    /// Members span the thickness: every block
    All,
}

impl PlyRange {
    pub fn classify(nodes: &[usize], topology: &Topology) -> Self {
        if nodes.iter().all(|&n| topology.is_bottom(n)) {
            PlyRange::Bottom
        } else if nodes.iter().all(|&n| topology.is_top(n)) {
            PlyRange::Top
        } else {
            PlyRange::All
        }
    }

    pub fn blocks(self, block_count: usize) -> Range<usize> {
        match self {
            PlyRange::Bottom => 0..block_count.min(1),
            PlyRange::Top => block_count.saturating_sub(1)..block_count,
            PlyRange::All => 0..block_count,
        }
    }
}

/// Members of a projected node set on one ply-block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyMembers {
    pub block: usize,
    pub real_nodes: Vec<usize>,
    /// Floating node pairs of the implied edges (empty for tie sets)
    pub floating_pairs: Vec<[usize; 2]>,
    /// Laminate ids of the implied edges
    pub edges: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedNodeSet {
    pub name: String,
    pub header: String,
    pub tie: bool,
    pub range: PlyRange,
    pub plies: Vec<PlyMembers>,
}

impl ProjectedNodeSet {
    /// All member labels in emission order.
    pub fn node_labels(&self) -> Vec<usize> {
        let mut out = Vec::new();
        for ply in &self.plies {
            out.extend(&ply.real_nodes);
            out.extend(ply.floating_pairs.iter().flatten());
        }
        out
    }

    /// Laminate ids of the edges constrained by this set.
    pub fn edge_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.plies.iter().flat_map(|ply| ply.edges.iter().copied())
    }
}

pub fn project_node_set(set: &NodeSetDef, topology: &Topology, layup: &Layup) -> Result<ProjectedNodeSet> {
    if let Some(&node) = set
        .nodes
        .iter()
        .find(|&&n| n == 0 || n > topology.real_node_count())
    {
        return Err(MeshError::UnknownSetNode {
            set: set.name.clone(),
            node,
        });
    }

    let index = StackIndex::new(topology, layup);
    let range = PlyRange::classify(&set.nodes, topology);
    let tie = set.is_tie();
    let implied = topology.implied_edges(&set.nodes);

    let plies = range
        .blocks(index.blocks)
        .map(|block| {
            let floating_pairs = if tie {
                Vec::new()
            } else {
                implied
                    .iter()
                    .filter_map(|&id| topology.edge(id))
                    .map(|edge| edge.floating().map(|f| index.ply_node(f, block)))
                    .collect()
            };
            PlyMembers {
                block,
                real_nodes: set.nodes.iter().map(|&n| index.ply_node(n, block)).collect(),
                floating_pairs,
                edges: implied.iter().map(|&id| index.ply_edge(id, block)).collect(),
            }
        })
        .collect();

    debug!(
        "node set '{}': {:?} range, {} implied edges, tie={}",
        set.name,
        range,
        implied.len(),
        tie
    );

    Ok(ProjectedNodeSet {
        name: set.name.clone(),
        header: set.header.clone(),
        tie,
        range,
        plies,
    })
}

/// Elements separated across one interface before the analysis starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredelamSet {
    pub elements: Vec<usize>,
    /// 1-based interface, counted from the bottom
    pub interface: usize,
}

pub fn project_predelam(
    set: &ElementSetDef,
    interface: usize,
    topology: &Topology,
    layup: &Layup,
) -> Result<PredelamSet> {
    let interfaces = layup.interface_count();
    if interface == 0 || interface > interfaces {
        return Err(MeshError::InvalidInterface {
            interface,
            interfaces,
        });
    }
    if let Some(&element) = set
        .elements
        .iter()
        .find(|&&label| topology.element_by_label(label).is_none())
    {
        return Err(MeshError::UnknownElement {
            set: set.name.clone(),
            element,
        });
    }
    Ok(PredelamSet {
        elements: set.elements.clone(),
        interface,
    })
}
