//! Replication of the single-ply topology through the ply-block stack.
//!
//! The laminate numbering is pure arithmetic on the single-ply labels:
//! ply-block `p` (0-based) shifts node labels by `p * nodes_per_ply` and edge
//! ids by `p * edges_per_ply`; the node of edge `e` on interface `p` follows
//! all ply-block nodes at `P * nodes_per_ply + p * edges_per_ply + e`.

use nalgebra::Point3;
use tracing::debug;

use crate::layup::{Layup, PlyBlock};
use crate::topology::Topology;

/// Index arithmetic of the laminate numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackIndex {
    pub blocks: usize,
    pub nodes_per_ply: usize,
    pub edges_per_ply: usize,
}

impl StackIndex {
    pub fn new(topology: &Topology, layup: &Layup) -> Self {
        Self {
            blocks: layup.block_count(),
            nodes_per_ply: topology.nodes_per_ply(),
            edges_per_ply: topology.edges_per_ply(),
        }
    }

    pub fn ply_node(&self, node: usize, block: usize) -> usize {
        node + block * self.nodes_per_ply
    }

    pub fn ply_edge(&self, edge: usize, block: usize) -> usize {
        edge + block * self.edges_per_ply
    }

    /// Label of the node carried by single-ply edge `edge` on interface `interface`.
    pub fn interface_node(&self, edge: usize, interface: usize) -> usize {
        self.blocks * self.nodes_per_ply + interface * self.edges_per_ply + edge
    }

    pub fn total_nodes(&self) -> usize {
        self.blocks * self.nodes_per_ply + self.blocks.saturating_sub(1) * self.edges_per_ply
    }

    pub fn total_edges(&self) -> usize {
        self.blocks * self.edges_per_ply
    }
}

/// Laminate element spanning every ply-block and interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaminateElement {
    /// Sequential label in the augmented deck
    pub label: usize,
    /// Element label in the source deck
    pub source_label: usize,
    pub nodes: Vec<usize>,
    pub edges: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Laminate {
    pub index: StackIndex,
    pub blocks: Vec<PlyBlock>,
    /// Coordinates of every laminate node; label `n` at index `n - 1`
    pub nodes: Vec<Point3<f64>>,
    pub elements: Vec<LaminateElement>,
}

impl Laminate {
    pub fn expand(topology: &Topology, layup: &Layup) -> Self {
        let index = StackIndex::new(topology, layup);

        let mut nodes = Vec::with_capacity(index.total_nodes());
        for block in 0..index.blocks {
            let z_bottom = layup.z_bottom(block);
            let z_top = layup.z_top(block);
            for (idx, node) in topology.nodes().iter().enumerate() {
                let label = idx + 1;
                let z = if topology.is_bottom(label) {
                    z_bottom
                } else if topology.is_top(label) {
                    z_top
                } else {
                    0.0
                };
                nodes.push(Point3::new(node.coords.x, node.coords.y, z));
            }
        }
        // Interface nodes carry no geometric meaning.
        nodes.resize(index.total_nodes(), Point3::origin());

        let elements = topology
            .elements()
            .iter()
            .enumerate()
            .map(|(idx, element)| {
                let mut el_nodes = Vec::with_capacity(
                    element.nodes.len() * index.blocks
                        + element.edges.len() * index.blocks.saturating_sub(1),
                );
                let mut el_edges = Vec::with_capacity(element.edges.len() * index.blocks);
                for block in 0..index.blocks {
                    el_nodes.extend(element.nodes.iter().map(|&n| index.ply_node(n, block)));
                    el_edges.extend(element.edges.iter().map(|e| index.ply_edge(e.id, block)));
                }
                for interface in 0..index.blocks.saturating_sub(1) {
                    el_nodes.extend(
                        element
                            .edges
                            .iter()
                            .map(|e| index.interface_node(e.id, interface)),
                    );
                }
                LaminateElement {
                    label: idx + 1,
                    source_label: element.label,
                    nodes: el_nodes,
                    edges: el_edges,
                }
            })
            .collect();

        let laminate = Self {
            index,
            blocks: layup.blocks().to_vec(),
            nodes,
            elements,
        };
        debug!(
            "laminate: {} ply-blocks, {} nodes, {} edges, {} nodes per element",
            index.blocks,
            laminate.node_count(),
            laminate.edge_count(),
            laminate.nodes_per_element()
        );
        laminate
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.index.total_edges()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn nodes_per_element(&self) -> usize {
        self.elements.first().map_or(0, |el| el.nodes.len())
    }

    pub fn edges_per_element(&self) -> usize {
        self.elements.first().map_or(0, |el| el.edges.len())
    }
}
