//! Deck summary reported by the `inspect` command.

use std::collections::BTreeMap;

use fnm_inp::{Card, Deck};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    pub total_cards: usize,
    pub total_data_lines: usize,
    pub keyword_counts: BTreeMap<String, usize>,
    pub part_names: Vec<String>,
    pub fnm_part_names: Vec<String>,
    pub material_defs: usize,
    pub assemblies: usize,
    pub node_rows: usize,
    pub element_rows: usize,
    pub node_sets: usize,
    pub element_sets: usize,
    pub steps: usize,
}

impl ModelSummary {
    pub fn from_deck(deck: &Deck) -> Self {
        let mut keyword_counts = BTreeMap::<String, usize>::new();
        let mut part_names = Vec::<String>::new();
        let mut fnm_part_names = Vec::<String>::new();
        let mut material_defs = 0usize;
        let mut assemblies = 0usize;
        let mut node_rows = 0usize;
        let mut element_rows = 0usize;
        let mut node_sets = 0usize;
        let mut element_sets = 0usize;
        let mut steps = 0usize;

        for card in &deck.cards {
            *keyword_counts.entry(card.keyword.clone()).or_insert(0) += 1;

            match normalized(&card.keyword).as_str() {
                "PART" => {
                    let name = part_name(card);
                    if name.to_ascii_lowercase().contains("fnm") {
                        fnm_part_names.push(name.clone());
                    }
                    part_names.push(name);
                }
                "ASSEMBLY" => assemblies += 1,
                "MATERIAL" => material_defs += 1,
                "NODE" => node_rows += card.data_lines.len(),
                "ELEMENT" => element_rows += card.data_lines.len(),
                "NSET" => node_sets += 1,
                "ELSET" => element_sets += 1,
                "STEP" => steps += 1,
                _ => {}
            }
        }

        let total_cards = deck.cards.len();
        let total_data_lines = deck.cards.iter().map(|c| c.data_lines.len()).sum();

        Self {
            total_cards,
            total_data_lines,
            keyword_counts,
            part_names,
            fnm_part_names,
            material_defs,
            assemblies,
            node_rows,
            element_rows,
            node_sets,
            element_sets,
            steps,
        }
    }
}

fn part_name(card: &Card) -> String {
    card.parameter("NAME").unwrap_or_default().to_string()
}

fn normalized(keyword: &str) -> String {
    keyword
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect::<String>()
        .to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use fnm_inp::Deck;

    use super::ModelSummary;

    #[test]
    fn summarizes_parts_sets_and_steps() {
        let src = r#"
*Heading
title
*Part, name=fnm-plate
*Node
1,0,0,0
2,1,0,0
*Element, type=C3D8R
1,1,2,3,4,5,6,7,8
*Nset, nset=tie-x
1, 2
*End Part
*Part, name=Support
*End Part
*Assembly, name=Assembly
*End Assembly
*Material, name=IM7
*Step, name=Load
*Static
1.,1.
*End Step
"#;
        let deck = Deck::parse_str(src).expect("parse should succeed");
        let s = ModelSummary::from_deck(&deck);
        assert_eq!(s.total_cards, 14);
        assert_eq!(s.part_names, vec!["fnm-plate".to_string(), "Support".to_string()]);
        assert_eq!(s.fnm_part_names, vec!["fnm-plate".to_string()]);
        assert_eq!(s.node_rows, 2);
        assert_eq!(s.element_rows, 1);
        assert_eq!(s.node_sets, 1);
        assert_eq!(s.element_sets, 0);
        assert_eq!(s.material_defs, 1);
        assert_eq!(s.assemblies, 1);
        assert_eq!(s.steps, 1);
    }
}
