//! The augmented input deck and its node/element include files.

use std::fmt::Write as _;

use fnm_mesh::{Laminate, ProjectedNodeSet};
use fnm_model::DeckSections;

use crate::format::{LineWrapper, real};
use crate::params::UelSettings;

pub const UEL_NODES_FILE: &str = "uel_nodes.inp";
pub const UEL_ELEMS_FILE: &str = "uel_elems.inp";

/// Convergence controls written before every `*End Step`, LF-terminated.
pub const STEP_CONTROLS: &str = concat!(
    "*Controls, reset\n",
    "*Controls, parameters=time incrementation\n",
    "3200, 4000, , 6000, 4800, 50, , 125, , , \n",
    "**\n",
);

/// [`STEP_CONTROLS`] with the line ending `terminator` uses.
fn step_controls(terminator: &str) -> String {
    if terminator.ends_with("\r\n") {
        STEP_CONTROLS.replace('\n', "\r\n")
    } else {
        STEP_CONTROLS.to_string()
    }
}

/// `uel_nodes.inp`: `label, x, y, z` for every laminate node.
pub fn render_uel_nodes(laminate: &Laminate) -> String {
    let mut out = String::new();
    for (idx, node) in laminate.nodes.iter().enumerate() {
        let _ = writeln!(out, "{}, {}, {}, {}", idx + 1, real(node.x), real(node.y), real(node.z));
    }
    out
}

/// `uel_elems.inp`: wrapped `label,n1,n2,...` connectivity.
pub fn render_uel_elems(laminate: &Laminate, settings: &UelSettings) -> String {
    let mut out = String::new();
    for element in &laminate.elements {
        let mut wrapper = LineWrapper::new(
            format!("{},", element.label),
            settings.line_length,
            settings.entries_per_line,
        );
        for &node in &element.nodes {
            wrapper.push(node);
        }
        for line in wrapper.finish() {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// The fnm part rewritten as a single user-element laminate.
pub fn render_fnm_part(
    name: &str,
    laminate: &Laminate,
    node_sets: &[ProjectedNodeSet],
    settings: &UelSettings,
) -> String {
    let element_type = settings.element_type();
    let mut out = String::new();
    let _ = writeln!(out, "*Part, name={name}");
    let _ = writeln!(out, "*NODE,INPUT={UEL_NODES_FILE}");
    let _ = writeln!(
        out,
        "*USER ELEMENT, TYPE={element_type}, NODES={}, COORDINATES={}, PROPERTIES={}, VARIABLES={}",
        laminate.nodes_per_element(),
        settings.coordinates,
        settings.properties,
        settings.variables
    );
    out.push_str("1,2,3\n");
    let _ = writeln!(out, "*ELEMENT, TYPE={element_type}, ELSET=fnm, INPUT={UEL_ELEMS_FILE}");
    out.push_str("*UEL PROPERTY, ELSET=fnm\n");
    out.push_str("1\n");

    for set in node_sets {
        out.push_str(&set.header);
        out.push('\n');
        let mut wrapper = LineWrapper::new("", settings.line_length, settings.entries_per_line);
        for ply in &set.plies {
            for &node in &ply.real_nodes {
                wrapper.push(node);
            }
            for &[first, second] in &ply.floating_pairs {
                wrapper.push_pair(first, second);
            }
        }
        for line in wrapper.finish() {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.push_str("*End Part\n");
    out
}

/// Full augmented deck: pass-through sections verbatim around the rewritten part.
pub fn render_deck(
    sections: &DeckSections,
    laminate: &Laminate,
    node_sets: &[ProjectedNodeSet],
    settings: &UelSettings,
) -> String {
    let mut out = String::new();
    out.extend(sections.header.iter().map(String::as_str));
    for part in &sections.ordinary_parts {
        out.extend(part.iter().map(String::as_str));
    }
    out.push_str(&render_fnm_part(
        &sections.fnm_part.name,
        laminate,
        node_sets,
        settings,
    ));
    for block in [
        &sections.assembly,
        &sections.materials,
        &sections.interaction_properties,
        &sections.boundary_conditions,
        &sections.interaction,
    ] {
        out.extend(block.iter().map(String::as_str));
    }
    for step in &sections.steps {
        out.extend(step.body.iter().map(String::as_str));
        out.push_str(&step_controls(&step.terminator));
        out.push_str(&step.terminator);
    }
    out
}
