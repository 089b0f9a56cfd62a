//! Extraction of the fnm part: real nodes, brick elements, node sets and the
//! optional pre-delamination element set.

use fnm_inp::{Card, Deck};
use nalgebra::Point3;
use tracing::{debug, warn};

use crate::error::{ModelError, Result};

/// Raw single-ply element as listed in the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    /// Element label in the deck
    pub label: usize,
    /// Real node labels, bottom ring first then top ring
    pub nodes: Vec<usize>,
}

/// A named node set of the fnm part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSetDef {
    /// Set name (value of the NSET parameter)
    pub name: String,
    /// Card header as written in the deck, without a GENERATE option
    pub header: String,
    /// Member real node labels in deck order
    pub nodes: Vec<usize>,
}

impl NodeSetDef {
    /// Tie sets constrain real degrees of freedom only.
    pub fn is_tie(&self) -> bool {
        self.name.to_ascii_lowercase().contains("tie")
    }
}

/// The pre-delamination element set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSetDef {
    pub name: String,
    pub elements: Vec<usize>,
}

/// Single-ply definition of the fnm part.
#[derive(Debug, Clone, PartialEq)]
pub struct FnmPart {
    pub name: String,
    pub element_type: Option<String>,
    /// Node coordinates; node label `n` is at index `n - 1`
    pub nodes: Vec<Point3<f64>>,
    pub elements: Vec<RawElement>,
    pub node_sets: Vec<NodeSetDef>,
    pub predelam: Option<ElementSetDef>,
}

impl FnmPart {
    /// Build the part from the cards strictly between `*Part` and `*End Part`.
    pub fn from_cards(name: &str, deck: &Deck, cards: &[Card]) -> Result<Self> {
        let element_cards: Vec<&Card> = cards.iter().filter(|c| c.is("ELEMENT")).collect();
        if element_cards.len() != 1 {
            return Err(ModelError::ElementSections {
                part: name.to_string(),
                count: element_cards.len(),
            });
        }

        let elset_cards: Vec<&Card> = cards
            .iter()
            .filter(|c| c.is("ELSET") && !c.has_parameter("INTERNAL"))
            .collect();
        if elset_cards.len() > 1 {
            return Err(ModelError::MultipleElementSets(elset_cards.len()));
        }
        if let Some(card) = elset_cards.first() {
            let set_name = card.parameter("ELSET").unwrap_or_default();
            if !set_name.to_ascii_lowercase().contains("predelam") {
                return Err(ModelError::UnsupportedElementSet(set_name.to_string()));
            }
        }

        let node_card = cards
            .iter()
            .find(|c| c.is("NODE"))
            .ok_or_else(|| ModelError::MissingNodes(name.to_string()))?;
        let nodes = parse_nodes(node_card)?;

        let element_card = element_cards[0];
        let elements = parse_elements(element_card)?;

        let mut node_sets = Vec::new();
        let mut predelam = None;
        for card in cards {
            if card.is("NODE") || card.is("ELEMENT") || card.has_parameter("INTERNAL") {
                continue;
            }
            if card.is("NSET") {
                node_sets.push(parse_node_set(deck, card)?);
            } else if card.is("ELSET") {
                predelam = Some(ElementSetDef {
                    name: card.parameter("ELSET").unwrap_or_default().to_string(),
                    elements: parse_labels(card)?,
                });
            } else {
                warn!(
                    "dropping *{} card at line {} inside fnm part '{}'",
                    card.keyword, card.line_start, name
                );
            }
        }

        debug!(
            "fnm part '{}': {} nodes, {} elements, {} node sets",
            name,
            nodes.len(),
            elements.len(),
            node_sets.len()
        );

        Ok(Self {
            name: name.to_string(),
            element_type: element_card.parameter("TYPE").map(str::to_string),
            nodes,
            elements,
            node_sets,
            predelam,
        })
    }
}

fn parse_nodes(card: &Card) -> Result<Vec<Point3<f64>>> {
    let mut nodes = Vec::with_capacity(card.data_lines.len());
    for data_line in &card.data_lines {
        let fields = split_fields(data_line);
        if fields.len() < 4 {
            return Err(ModelError::invalid_data(
                card.line_start,
                format!("node line needs a label and three coordinates: {data_line}"),
            ));
        }
        let label = parse_label(fields[0], card.line_start)?;
        let expected = nodes.len() + 1;
        if label != expected {
            return Err(ModelError::NodeNumbering {
                expected,
                found: label,
            });
        }
        let mut xyz = [0.0f64; 3];
        for (slot, raw) in xyz.iter_mut().zip(&fields[1..4]) {
            *slot = raw.parse::<f64>().map_err(|_| {
                ModelError::invalid_data(
                    card.line_start,
                    format!("invalid coordinate '{raw}' for node {label}"),
                )
            })?;
        }
        nodes.push(Point3::new(xyz[0], xyz[1], xyz[2]));
    }
    Ok(nodes)
}

fn parse_elements(card: &Card) -> Result<Vec<RawElement>> {
    let mut elements = Vec::new();
    let mut pending: Vec<usize> = Vec::new();

    for data_line in &card.data_lines {
        for field in split_fields(data_line) {
            pending.push(parse_label(field, card.line_start)?);
        }
        // A trailing comma continues the element on the next line.
        if data_line.trim_end().ends_with(',') {
            continue;
        }
        if let Some((&label, nodes)) = pending.split_first() {
            elements.push(RawElement {
                label,
                nodes: nodes.to_vec(),
            });
        }
        pending.clear();
    }

    if !pending.is_empty() {
        return Err(ModelError::invalid_data(
            card.line_start,
            "element definition continues past the end of the *Element section",
        ));
    }
    Ok(elements)
}

fn parse_node_set(deck: &Deck, card: &Card) -> Result<NodeSetDef> {
    let name = card
        .parameter("NSET")
        .ok_or_else(|| ModelError::invalid_data(card.line_start, "*Nset card without NSET name"))?
        .to_string();
    let raw_header = deck
        .raw_lines(card.line_start, card.line_start)
        .first()
        .map(|line| line.trim_end().to_string())
        .unwrap_or_else(|| format!("*Nset, nset={name}"));

    Ok(NodeSetDef {
        name,
        header: strip_generate(&raw_header),
        nodes: parse_labels(card)?,
    })
}

/// Labels of an `*Nset`/`*Elset` card, expanding `generate` ranges.
fn parse_labels(card: &Card) -> Result<Vec<usize>> {
    let mut labels = Vec::new();
    if card.has_parameter("GENERATE") {
        for data_line in &card.data_lines {
            let fields = split_fields(data_line);
            if fields.len() < 2 {
                return Err(ModelError::invalid_data(
                    card.line_start,
                    format!("generate line needs start and end labels: {data_line}"),
                ));
            }
            let start = parse_label(fields[0], card.line_start)?;
            let end = parse_label(fields[1], card.line_start)?;
            let step = match fields.get(2) {
                Some(raw) => parse_label(raw, card.line_start)?,
                None => 1,
            };
            if step == 0 {
                return Err(ModelError::invalid_data(card.line_start, "generate increment must be positive"));
            }
            labels.extend((start..=end).step_by(step));
        }
    } else {
        for data_line in &card.data_lines {
            for field in split_fields(data_line) {
                labels.push(parse_label(field, card.line_start)?);
            }
        }
    }
    Ok(labels)
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).filter(|f| !f.is_empty()).collect()
}

fn parse_label(raw: &str, line: usize) -> Result<usize> {
    raw.parse::<usize>()
        .map_err(|_| ModelError::invalid_data(line, format!("invalid label '{raw}'")))
}

fn strip_generate(header: &str) -> String {
    header
        .split(',')
        .filter(|field| !field.trim().eq_ignore_ascii_case("generate"))
        .collect::<Vec<_>>()
        .join(",")
}
