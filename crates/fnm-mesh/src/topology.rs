//! Single-ply topology: edge discovery and floating node allocation.
//!
//! Every edge parallel to the shell plane (the rings of the bottom and top
//! faces of each brick) is created once, the first time its node pair is
//! walked, and receives two floating nodes. All labels are 1-based, matching
//! the deck.

use std::collections::{BTreeSet, HashMap};

use fnm_model::RawElement;
use nalgebra::Point3;
use tracing::debug;

use crate::error::{MeshError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Real,
    Floating,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub coords: Point3<f64>,
    pub kind: NodeKind,
}

/// Edge as `[end_a, end_b, floating_a, floating_b]`, stored in the direction
/// it was first walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub nodes: [usize; 4],
}

impl Edge {
    pub fn ends(&self) -> [usize; 2] {
        [self.nodes[0], self.nodes[1]]
    }

    pub fn floating(&self) -> [usize; 2] {
        [self.nodes[2], self.nodes[3]]
    }
}

/// A canonical edge id seen in a given traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeRef {
    pub id: usize,
    pub reversed: bool,
}

impl EdgeRef {
    /// `+id` along the stored direction, `-id` against it.
    pub fn signed(self) -> i64 {
        let id = self.id as i64;
        if self.reversed { -id } else { id }
    }
}

/// Single-ply element after edge discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub label: usize,
    /// Real nodes (bottom ring, top ring) followed by the floating nodes of
    /// each edge in traversal order, oriented along the traversal.
    pub nodes: Vec<usize>,
    pub edges: Vec<EdgeRef>,
    real_count: usize,
}

impl Element {
    pub fn real_nodes(&self) -> &[usize] {
        &self.nodes[..self.real_count]
    }

    pub fn floating_nodes(&self) -> &[usize] {
        &self.nodes[self.real_count..]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    elements: Vec<Element>,
    pair_index: HashMap<(usize, usize), usize>,
    /// Element label to position in `elements`
    label_index: HashMap<usize, usize>,
    bottom: BTreeSet<usize>,
    top: BTreeSet<usize>,
    real_count: usize,
}

impl Topology {
    /// Number of real plus floating nodes of one ply.
    pub fn nodes_per_ply(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges_per_ply(&self) -> usize {
        self.edges.len()
    }

    pub fn real_node_count(&self) -> usize {
        self.real_count
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, label: usize) -> Option<&Node> {
        label.checked_sub(1).and_then(|idx| self.nodes.get(idx))
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: usize) -> Option<&Edge> {
        id.checked_sub(1).and_then(|idx| self.edges.get(idx))
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element_by_label(&self, label: usize) -> Option<&Element> {
        self.label_index.get(&label).map(|&idx| &self.elements[idx])
    }

    pub fn is_bottom(&self, label: usize) -> bool {
        self.bottom.contains(&label)
    }

    pub fn is_top(&self, label: usize) -> bool {
        self.top.contains(&label)
    }

    pub fn bottom_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.bottom.iter().copied()
    }

    pub fn top_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.top.iter().copied()
    }

    /// Edge joining `a` to `b`, oriented from `a` to `b`.
    pub fn edge_between(&self, a: usize, b: usize) -> Option<EdgeRef> {
        self.pair_index.get(&pair_key(a, b)).map(|&id| EdgeRef {
            id,
            reversed: self.edges[id - 1].nodes[0] != a,
        })
    }

    /// Signed directed lookup: `+id`, `-id`, or `0` when no edge joins the pair.
    pub fn directed_edge(&self, a: usize, b: usize) -> i64 {
        self.edge_between(a, b).map_or(0, EdgeRef::signed)
    }

    /// Ids of every edge joining two members of `nodes`, in pair order.
    pub fn implied_edges(&self, nodes: &[usize]) -> Vec<usize> {
        let mut out = Vec::new();
        for (i, &a) in nodes.iter().enumerate() {
            for &b in &nodes[i + 1..] {
                if let Some(edge) = self.edge_between(a, b) {
                    out.push(edge.id);
                }
            }
        }
        out
    }

    /// Shortest and longest edge, measured between the real end nodes.
    pub fn edge_length_range(&self) -> Option<(f64, f64)> {
        self.edges
            .iter()
            .filter_map(|edge| {
                let [a, b] = edge.ends();
                Some(nalgebra::distance(&self.node(a)?.coords, &self.node(b)?.coords))
            })
            .fold(None, |acc, len| match acc {
                None => Some((len, len)),
                Some((lo, hi)) => Some((lo.min(len), hi.max(len))),
            })
    }
}

/// Arena that grows nodes, edges and elements while elements are walked in
/// deck order.
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    elements: Vec<Element>,
    pair_index: HashMap<(usize, usize), usize>,
    bottom: BTreeSet<usize>,
    top: BTreeSet<usize>,
    real_count: usize,
    element_size: Option<usize>,
}

impl TopologyBuilder {
    pub fn new(real_nodes: &[Point3<f64>]) -> Self {
        Self {
            nodes: real_nodes
                .iter()
                .map(|&coords| Node {
                    coords,
                    kind: NodeKind::Real,
                })
                .collect(),
            edges: Vec::new(),
            elements: Vec::new(),
            pair_index: HashMap::new(),
            bottom: BTreeSet::new(),
            top: BTreeSet::new(),
            real_count: real_nodes.len(),
            element_size: None,
        }
    }

    /// Walk every element in order and return the finished topology.
    pub fn build(real_nodes: &[Point3<f64>], elements: &[RawElement]) -> Result<Topology> {
        if elements.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        let mut builder = Self::new(real_nodes);
        for element in elements {
            builder.add_element(element.label, &element.nodes)?;
        }
        let topology = builder.finish();
        debug!(
            "single-ply topology: {} real nodes, {} edges, {} nodes per ply",
            topology.real_node_count(),
            topology.edges_per_ply(),
            topology.nodes_per_ply()
        );
        Ok(topology)
    }

    /// Discover the bottom-ring and top-ring edges of one element.
    pub fn add_element(&mut self, label: usize, real: &[usize]) -> Result<()> {
        self.validate_element(label, real)?;

        let half = real.len() / 2;
        let mut element = Element {
            label,
            nodes: real.to_vec(),
            edges: Vec::with_capacity(real.len()),
            real_count: real.len(),
        };

        for (face, ring) in real.chunks(half).enumerate() {
            for (i, &a) in ring.iter().enumerate() {
                let b = ring[(i + 1) % half];
                let edge_ref = match self.lookup(a, b) {
                    Some(existing) => existing,
                    None => self.create_edge(a, b),
                };
                let [fa, fb] = self.edges[edge_ref.id - 1].floating();
                if edge_ref.reversed {
                    element.nodes.extend([fb, fa]);
                } else {
                    element.nodes.extend([fa, fb]);
                }
                element.edges.push(edge_ref);
            }
            let face_set = if face == 0 { &mut self.bottom } else { &mut self.top };
            face_set.extend(ring.iter().copied());
        }

        self.elements.push(element);
        Ok(())
    }

    pub fn finish(self) -> Topology {
        let mut label_index = HashMap::with_capacity(self.elements.len());
        for (idx, element) in self.elements.iter().enumerate() {
            label_index.entry(element.label).or_insert(idx);
        }
        Topology {
            nodes: self.nodes,
            edges: self.edges,
            elements: self.elements,
            pair_index: self.pair_index,
            label_index,
            bottom: self.bottom,
            top: self.top,
            real_count: self.real_count,
        }
    }

    fn validate_element(&mut self, label: usize, real: &[usize]) -> Result<()> {
        if real.len() < 6 || real.len() % 2 != 0 {
            return Err(MeshError::invalid_element(
                label,
                format!(
                    "expected an even number (at least 6) of nodes forming bottom and top rings, found {}",
                    real.len()
                ),
            ));
        }
        let expected = *self.element_size.get_or_insert(real.len());
        if real.len() != expected {
            return Err(MeshError::InconsistentElement {
                label,
                expected,
                found: real.len(),
            });
        }
        if let Some(&node) = real.iter().find(|&&n| n == 0 || n > self.real_count) {
            return Err(MeshError::UnknownNode {
                element: label,
                node,
            });
        }
        for ring in real.chunks(real.len() / 2) {
            for (i, &a) in ring.iter().enumerate() {
                if a == ring[(i + 1) % ring.len()] {
                    return Err(MeshError::invalid_element(
                        label,
                        format!("node {a} repeats consecutively in a face ring"),
                    ));
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, a: usize, b: usize) -> Option<EdgeRef> {
        self.pair_index.get(&pair_key(a, b)).map(|&id| EdgeRef {
            id,
            reversed: self.edges[id - 1].nodes[0] != a,
        })
    }

    fn create_edge(&mut self, a: usize, b: usize) -> EdgeRef {
        let fa = self.nodes.len() + 1;
        let fb = fa + 1;
        for _ in 0..2 {
            self.nodes.push(Node {
                coords: Point3::origin(),
                kind: NodeKind::Floating,
            });
        }
        self.edges.push(Edge {
            nodes: [a, b, fa, fb],
        });
        let id = self.edges.len();
        self.pair_index.insert(pair_key(a, b), id);
        EdgeRef {
            id,
            reversed: false,
        }
    }
}

fn pair_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ]
    }

    /// 2x1 bricks sharing the face 2-5-11-8.
    fn two_bricks() -> (Vec<Point3<f64>>, Vec<RawElement>) {
        let mut nodes = Vec::new();
        for z in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for x in [0.0, 1.0, 2.0] {
                    nodes.push(Point3::new(x, y, z));
                }
            }
        }
        let elements = vec![
            RawElement {
                label: 1,
                nodes: vec![1, 2, 5, 4, 7, 8, 11, 10],
            },
            RawElement {
                label: 2,
                nodes: vec![2, 3, 6, 5, 8, 9, 12, 11],
            },
        ];
        (nodes, elements)
    }

    #[test]
    fn elements_are_found_by_deck_label() {
        let (nodes, mut elements) = two_bricks();
        elements[0].label = 101;
        elements[1].label = 7;
        let topo = TopologyBuilder::build(&nodes, &elements).expect("topology should build");

        let second = topo.element_by_label(7).expect("label 7 exists");
        assert_eq!(&second.real_nodes()[..4], &[2, 3, 6, 5]);
        assert_eq!(topo.element_by_label(101).map(|el| el.label), Some(101));
        assert!(topo.element_by_label(1).is_none());
        assert!(topo.element_by_label(2).is_none());
    }

    #[test]
    fn single_hex_discovers_eight_edges() {
        let element = RawElement {
            label: 1,
            nodes: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        let topo = TopologyBuilder::build(&unit_cube(), &[element]).expect("topology should build");

        assert_eq!(topo.edges_per_ply(), 8);
        assert_eq!(topo.nodes_per_ply(), 8 + 16);
        let el = &topo.elements()[0];
        assert_eq!(el.nodes.len(), 24);
        assert_eq!(el.floating_nodes(), (9..=24).collect::<Vec<_>>().as_slice());
        assert_eq!(topo.edge(1).map(|e| e.nodes), Some([1, 2, 9, 10]));
        assert_eq!(topo.edge(4).map(|e| e.nodes), Some([4, 1, 15, 16]));
        assert_eq!(topo.edge(5).map(|e| e.nodes), Some([5, 6, 17, 18]));
        assert!(topo.nodes()[8..].iter().all(|n| n.kind == NodeKind::Floating));
        assert_eq!(topo.bottom_nodes().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(topo.top_nodes().collect::<Vec<_>>(), vec![5, 6, 7, 8]);
    }

    #[test]
    fn shared_edge_is_reused_with_swapped_floating_nodes() {
        let (nodes, elements) = two_bricks();
        let topo = TopologyBuilder::build(&nodes, &elements).expect("topology should build");

        assert_eq!(topo.edges_per_ply(), 14);
        assert_eq!(topo.nodes_per_ply(), 12 + 28);

        let second = &topo.elements()[1];
        let signed: Vec<i64> = second.edges.iter().map(|e| e.signed()).collect();
        assert_eq!(signed, vec![9, 10, 11, -2, 12, 13, 14, -6]);

        // Edge 2 runs 2 -> 5 with floating nodes 15, 16; element 2 walks it 5 -> 2.
        assert_eq!(topo.edge(2).map(|e| e.nodes), Some([2, 5, 15, 16]));
        assert_eq!(&second.floating_nodes()[6..8], &[16, 15]);
        assert_eq!(&topo.elements()[0].floating_nodes()[2..4], &[15, 16]);
        assert_eq!(&second.floating_nodes()[14..16], &[24, 23]);
    }

    #[test]
    fn directed_lookup_carries_the_sign() {
        let (nodes, elements) = two_bricks();
        let topo = TopologyBuilder::build(&nodes, &elements).expect("topology should build");
        assert_eq!(topo.directed_edge(2, 5), 2);
        assert_eq!(topo.directed_edge(5, 2), -2);
        assert_eq!(topo.directed_edge(1, 7), 0);
        assert_eq!(topo.directed_edge(1, 5), 0);
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let (nodes, elements) = two_bricks();
        let first = TopologyBuilder::build(&nodes, &elements).expect("topology should build");
        let second = TopologyBuilder::build(&nodes, &elements).expect("topology should build");
        assert_eq!(first, second);
        for a in 1..=12 {
            for b in 1..=12 {
                assert_eq!(first.directed_edge(a, b), second.directed_edge(a, b));
            }
        }
    }

    #[test]
    fn floating_nodes_are_never_shared_between_edges() {
        let (nodes, elements) = two_bricks();
        let topo = TopologyBuilder::build(&nodes, &elements).expect("topology should build");
        let mut seen = BTreeSet::new();
        for edge in topo.edges() {
            for f in edge.floating() {
                assert!(seen.insert(f), "floating node {f} reused");
                assert!(f > topo.real_node_count());
            }
        }
        assert_eq!(seen.len(), 2 * topo.edges_per_ply());
    }

    #[test]
    fn implied_edges_follow_pair_order() {
        let (nodes, elements) = two_bricks();
        let topo = TopologyBuilder::build(&nodes, &elements).expect("topology should build");
        assert_eq!(topo.implied_edges(&[1, 2, 3, 4, 5, 6]), vec![1, 4, 9, 2, 10, 3, 11]);
        assert_eq!(topo.implied_edges(&[1, 4, 7, 10]), vec![4, 8]);
    }

    #[test]
    fn measures_edge_lengths() {
        let (mut nodes, elements) = two_bricks();
        for node in nodes.iter_mut() {
            node.x *= 2.0;
        }
        let topo = TopologyBuilder::build(&nodes, &elements).expect("topology should build");
        let (lo, hi) = topo.edge_length_range().expect("mesh has edges");
        assert!((lo - 1.0).abs() < 1e-12);
        assert!((hi - 2.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_unknown_nodes_and_mixed_element_sizes() {
        let bad = RawElement {
            label: 7,
            nodes: vec![1, 2, 3, 4, 5, 6, 7, 99],
        };
        let err = TopologyBuilder::build(&unit_cube(), &[bad]).expect_err("should fail");
        assert_eq!(err, MeshError::UnknownNode { element: 7, node: 99 });

        let hex = RawElement {
            label: 1,
            nodes: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        let wedge = RawElement {
            label: 2,
            nodes: vec![1, 2, 3, 5, 6, 7],
        };
        let err = TopologyBuilder::build(&unit_cube(), &[hex, wedge]).expect_err("should fail");
        assert!(matches!(err, MeshError::InconsistentElement { label: 2, expected: 8, found: 6 }));
    }

    #[test]
    fn rejects_odd_and_degenerate_elements() {
        let odd = RawElement {
            label: 3,
            nodes: vec![1, 2, 3, 4, 5, 6, 7],
        };
        assert!(matches!(
            TopologyBuilder::build(&unit_cube(), &[odd]),
            Err(MeshError::InvalidElement { label: 3, .. })
        ));

        let degenerate = RawElement {
            label: 4,
            nodes: vec![1, 1, 3, 4, 5, 6, 7, 8],
        };
        assert!(matches!(
            TopologyBuilder::build(&unit_cube(), &[degenerate]),
            Err(MeshError::InvalidElement { label: 4, .. })
        ));
        assert_eq!(TopologyBuilder::build(&unit_cube(), &[]), Err(MeshError::EmptyMesh));
    }
}
