//! Splits a parsed deck into the sections the preprocessor rewrites or passes
//! through.
//!
//! Pass-through sections are kept as raw lines (terminators included) so the
//! augmented deck reproduces them byte-for-byte.

use fnm_inp::{Card, Deck, is_comment};
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::part::FnmPart;

/// A step copied from the deck, split before its `*End Step` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSection {
    pub body: Vec<String>,
    pub terminator: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeckSections {
    pub header: Vec<String>,
    pub ordinary_parts: Vec<Vec<String>>,
    pub fnm_part: FnmPart,
    pub assembly: Vec<String>,
    pub materials: Vec<String>,
    pub interaction_properties: Vec<String>,
    pub boundary_conditions: Vec<String>,
    pub interaction: Vec<String>,
    pub steps: Vec<StepSection>,
}

impl DeckSections {
    /// Locate every section and validate the supported-model assumptions.
    ///
    /// Validation happens before any section content is interpreted, so a
    /// deck with several fnm parts fails without parsing their meshes.
    pub fn extract(deck: &Deck) -> Result<Self> {
        let part_cards: Vec<usize> = deck.find_cards("PART").collect();
        let fnm_parts: Vec<usize> = part_cards
            .iter()
            .copied()
            .filter(|&idx| is_fnm_part(&deck.cards[idx]))
            .collect();
        match fnm_parts.len() {
            0 => return Err(ModelError::MissingFnmPart),
            1 => {}
            n => return Err(ModelError::MultipleFnmParts(n)),
        }

        let assemblies: Vec<usize> = deck.find_cards("ASSEMBLY").collect();
        if assemblies.len() != 1 {
            return Err(ModelError::AssemblyCount(assemblies.len()));
        }

        let first_part_line = deck.cards[part_cards[0]].line_start;
        let header = deck.raw_lines(1, first_part_line - 1).to_vec();

        let mut ordinary_parts = Vec::new();
        let mut fnm_part = None;
        for &idx in &part_cards {
            let end = matching_end(deck, idx, "END PART", "Part")?;
            let card = &deck.cards[idx];
            if is_fnm_part(card) {
                let name = card.parameter("NAME").unwrap_or_default();
                fnm_part = Some(FnmPart::from_cards(name, deck, &deck.cards[idx + 1..end])?);
            } else {
                let end_line = deck.cards[end].line_start;
                ordinary_parts.push(deck.raw_lines(card.line_start, end_line).to_vec());
            }
        }
        let fnm_part = fnm_part.ok_or(ModelError::MissingFnmPart)?;

        let assembly_idx = assemblies[0];
        let assembly_end = matching_end(deck, assembly_idx, "END ASSEMBLY", "Assembly")?;
        let assembly = deck
            .raw_lines(
                deck.cards[assembly_idx].line_start,
                deck.cards[assembly_end].line_start,
            )
            .to_vec();

        let materials = deck
            .find_cards("MATERIAL")
            .next()
            .map(|idx| lines_through_comment(deck, deck.cards[idx].line_start))
            .unwrap_or_default();

        let interaction_properties: Vec<String> = deck
            .find_cards("SURFACE INTERACTION")
            .flat_map(|idx| lines_through_comment(deck, deck.cards[idx].line_start))
            .collect();

        let separator = step_separator_line(deck);
        let boundary_conditions: Vec<String> = deck
            .find_cards("BOUNDARY")
            .filter(|&idx| deck.cards[idx].line_start < separator)
            .flat_map(|idx| lines_until_comment(deck, deck.cards[idx].line_start, separator))
            .collect();

        let interaction = deck
            .lines
            .iter()
            .take(separator.saturating_sub(1))
            .position(|line| line.trim().starts_with("** Interaction:"))
            .map(|pos| lines_until_comment(deck, pos + 2, separator))
            .unwrap_or_default();

        let mut steps = Vec::new();
        for idx in deck.find_cards("STEP") {
            let end = matching_end(deck, idx, "END STEP", "Step")?;
            let end_line = deck.cards[end].line_start;
            steps.push(StepSection {
                body: deck.raw_lines(deck.cards[idx].line_start, end_line - 1).to_vec(),
                terminator: deck.lines[end_line - 1].clone(),
            });
        }

        debug!(
            "deck sections: {} ordinary parts, {} steps, {} boundary lines",
            ordinary_parts.len(),
            steps.len(),
            boundary_conditions.len()
        );

        Ok(Self {
            header,
            ordinary_parts,
            fnm_part,
            assembly,
            materials,
            interaction_properties,
            boundary_conditions,
            interaction,
            steps,
        })
    }
}

fn is_fnm_part(card: &Card) -> bool {
    card.parameter("NAME")
        .is_some_and(|name| name.to_ascii_lowercase().contains("fnm"))
}

/// Index of the first `end_keyword` card after `start`.
fn matching_end(deck: &Deck, start: usize, end_keyword: &str, keyword: &'static str) -> Result<usize> {
    deck.cards
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, card)| card.is(end_keyword))
        .map(|(idx, _)| idx)
        .ok_or(ModelError::Unterminated {
            keyword,
            line: deck.cards[start].line_start,
        })
}

/// Raw lines from `start` (1-based) through the next comment line, inclusive.
fn lines_through_comment(deck: &Deck, start: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in deck.lines.iter().skip(start.saturating_sub(1)) {
        out.push(line.clone());
        if is_comment(line.trim()) {
            break;
        }
    }
    out
}

/// Raw lines from `start` up to, but excluding, the next comment line or `limit`.
fn lines_until_comment(deck: &Deck, start: usize, limit: usize) -> Vec<String> {
    deck.raw_lines(start, limit.saturating_sub(1))
        .iter()
        .take_while(|line| !is_comment(line.trim()))
        .cloned()
        .collect()
}

/// 1-based line closing the initial step: the first `** ----` separator or the
/// first `*Step` card, whichever comes first, else one past the last line.
fn step_separator_line(deck: &Deck) -> usize {
    let separator = deck
        .lines
        .iter()
        .position(|line| {
            line.trim()
                .strip_prefix("**")
                .is_some_and(|rest| rest.trim_start().starts_with("----"))
        })
        .map_or(deck.lines.len() + 1, |pos| pos + 1);
    deck.find_cards("STEP")
        .next()
        .map_or(separator, |idx| separator.min(deck.cards[idx].line_start))
}
