//! Plain-text description files read by the floating node user element.
//!
//! One record per line, fields separated by single spaces.

use std::fmt::Write as _;

use fnm_mesh::{Laminate, PredelamSet, ProjectedNodeSet};

use crate::format::{angle, real};
use crate::params::ElementSizeBounds;

/// `fnm_nodes.txt`: node count, then `x y z` for every laminate node.
pub fn render_nodes(laminate: &Laminate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", laminate.node_count());
    for node in &laminate.nodes {
        let _ = writeln!(out, "{} {} {}", real(node.x), real(node.y), real(node.z));
    }
    out
}

/// `fnm_edges.txt`: total edge count, the edges constrained by tie sets, `-1`.
pub fn render_edges<'a>(
    laminate: &Laminate,
    tie_sets: impl IntoIterator<Item = &'a ProjectedNodeSet>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", laminate.edge_count());
    for set in tie_sets {
        for edge in set.edge_ids() {
            let _ = writeln!(out, "{edge}");
        }
    }
    out.push_str("-1\n");
    out
}

/// `fnm_elems.txt`: sizes, the ply-block layup, then node and edge lines per element.
pub fn render_elems(laminate: &Laminate) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {}",
        laminate.element_count(),
        laminate.nodes_per_element(),
        laminate.edges_per_element()
    );
    let _ = writeln!(out, "{}", laminate.blocks.len());
    for block in &laminate.blocks {
        let _ = writeln!(out, "{} {}", angle(block.angle), block.plies);
    }
    for element in &laminate.elements {
        let _ = writeln!(out, "{}", join(&element.nodes));
        let _ = writeln!(out, "{}", join(&element.edges));
    }
    out
}

/// `fnm_predelam.txt`: `0` without a set, else count, interface and labels.
pub fn render_predelam(predelam: Option<&PredelamSet>) -> String {
    let Some(set) = predelam else {
        return "0\n".to_string();
    };
    let mut out = String::new();
    let _ = writeln!(out, "{}", set.elements.len());
    let _ = writeln!(out, "{}", set.interface);
    for label in &set.elements {
        let _ = writeln!(out, "{label}");
    }
    out
}

/// `fnm_matrix_crack.txt`: element size bounds, ply-block count and the
/// largest number of matrix cracks per ply.
pub fn render_matrix_crack(laminate: &Laminate, bounds: &ElementSizeBounds) -> String {
    format!(
        "{} {}\n{}\n{}\n",
        real(bounds.min),
        real(bounds.max),
        laminate.blocks.len(),
        max_cracks(laminate.element_count())
    )
}

/// `floor(sqrt(elements))`
pub fn max_cracks(elements: usize) -> usize {
    let mut root = (elements as f64).sqrt() as usize;
    while root * root > elements {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= elements {
        root += 1;
    }
    root
}

fn join(labels: &[usize]) -> String {
    labels.iter().map(usize::to_string).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::two_brick_model;

    #[test]
    fn nodes_file_lists_every_laminate_node() {
        let model = two_brick_model();
        let text = render_nodes(&model.laminate);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 95);
        assert_eq!(lines[0], "94");
        assert_eq!(lines[1], "0.0 0.0 0.0");
        // Node 7 is on the top face of the first block.
        assert_eq!(lines[7], "0.0 0.0 0.125");
        // Node 47 is node 7 lifted onto the second block.
        assert_eq!(lines[47], "0.0 0.0 0.25");
        assert_eq!(lines[94], "0.0 0.0 0.0");
    }

    #[test]
    fn edges_file_lists_tie_set_edges() {
        let model = two_brick_model();
        let text = render_edges(&model.laminate, model.tie_sets());
        assert_eq!(text, "28\n1\n4\n9\n2\n10\n3\n11\n-1\n");
    }

    #[test]
    fn edges_file_without_tie_sets() {
        let model = two_brick_model();
        assert_eq!(render_edges(&model.laminate, []), "28\n-1\n");
    }

    #[test]
    fn elems_file_has_layup_and_connectivity() {
        let model = two_brick_model();
        let text = render_elems(&model.laminate);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2 56 16");
        assert_eq!(lines[1], "2");
        assert_eq!(lines[2], "0 1");
        assert_eq!(lines[3], "90 1");
        assert_eq!(lines.len(), 4 + 2 * 2);

        let first_nodes: Vec<usize> = lines[4]
            .split(' ')
            .map(|f| f.parse().expect("integer label"))
            .collect();
        assert_eq!(first_nodes.len(), 56);
        assert_eq!(&first_nodes[..8], &[1, 2, 5, 4, 7, 8, 11, 10]);
        assert_eq!(&first_nodes[48..], &[81, 82, 83, 84, 85, 86, 87, 88]);
        assert_eq!(lines[7], "9 10 11 2 12 13 14 6 23 24 25 16 26 27 28 20");
    }

    #[test]
    fn predelam_file() {
        let model = two_brick_model();
        assert_eq!(render_predelam(model.predelam.as_ref()), "1\n1\n2\n");
        assert_eq!(render_predelam(None), "0\n");
    }

    #[test]
    fn matrix_crack_file() {
        let model = two_brick_model();
        assert_eq!(
            render_matrix_crack(&model.laminate, &model.element_sizes),
            "0.5 1.0\n2\n1\n"
        );
    }

    #[test]
    fn crack_count_is_integer_square_root() {
        assert_eq!(max_cracks(0), 0);
        assert_eq!(max_cracks(3), 1);
        assert_eq!(max_cracks(4), 2);
        assert_eq!(max_cracks(99), 9);
        assert_eq!(max_cracks(100), 10);
    }
}
