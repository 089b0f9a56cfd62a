//! Abaqus `.inp` keyword deck parser.
//!
//! Besides the structured cards, the parser keeps every raw line of the deck
//! (terminators included) so that untouched sections can be re-emitted
//! verbatim.

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
    /// Raw source lines, each with its original line terminator.
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub keyword: String,
    pub parameters: Vec<Parameter>,
    pub data_lines: Vec<String>,
    /// 1-based line of the card header.
    pub line_start: usize,
    /// 1-based last line consumed by the card, trailing comments included.
    pub line_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

impl Deck {
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ParseError {
            line: 0,
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::parse_str(&raw)
    }

    pub fn parse_str(raw: &str) -> Result<Self, ParseError> {
        let raw_lines: Vec<String> = raw.split_inclusive('\n').map(str::to_string).collect();
        let lines: Vec<&str> = raw_lines.iter().map(|l| l.trim_end_matches(['\n', '\r'])).collect();
        let mut cards = Vec::new();
        let mut i = 0usize;

        while i < lines.len() {
            let trimmed = lines[i].trim();

            if trimmed.is_empty() || is_comment(trimmed) {
                i += 1;
                continue;
            }

            if !trimmed.starts_with('*') {
                return Err(ParseError {
                    line: i + 1,
                    message: "expected card starting with '*'".to_string(),
                });
            }

            let line_start = i + 1;
            let mut header = trimmed.trim_start_matches('*').trim().to_string();
            i += 1;

            // Abaqus-style header continuation with leading comma.
            while i < lines.len() {
                let next = lines[i].trim();
                if next.starts_with(',') {
                    header.push_str(next);
                    i += 1;
                    continue;
                }
                break;
            }

            let (keyword, parameters) = parse_header(&header, line_start)?;

            let mut data_lines = Vec::new();
            while i < lines.len() {
                let candidate = lines[i].trim();
                if candidate.is_empty() || is_comment(candidate) {
                    i += 1;
                    continue;
                }
                if candidate.starts_with('*') {
                    break;
                }
                data_lines.push(candidate.to_string());
                i += 1;
            }

            cards.push(Card {
                keyword,
                parameters,
                data_lines,
                line_start,
                line_end: i,
            });
        }

        Ok(Deck {
            cards,
            lines: raw_lines,
        })
    }

    /// Raw lines `start..=end` (1-based, inclusive), clamped to the deck.
    pub fn raw_lines(&self, start: usize, end: usize) -> &[String] {
        let from = start.saturating_sub(1).min(self.lines.len());
        let to = end.min(self.lines.len()).max(from);
        &self.lines[from..to]
    }

    /// Indices of the cards whose normalized keyword equals `keyword`.
    pub fn find_cards<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = usize> + 'a {
        let wanted = normalized_keyword(keyword);
        self.cards
            .iter()
            .enumerate()
            .filter(move |(_, card)| normalized_keyword(&card.keyword) == wanted)
            .map(|(idx, _)| idx)
    }
}

impl Card {
    /// Whether the card keyword matches `keyword`, ignoring case, blanks and underscores.
    pub fn is(&self, keyword: &str) -> bool {
        normalized_keyword(&self.keyword) == normalized_keyword(keyword)
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(key))
            .and_then(|p| p.value.as_deref())
    }

    pub fn has_parameter(&self, key: &str) -> bool {
        self.parameters.iter().any(|p| p.key.eq_ignore_ascii_case(key))
    }
}

/// Whether a trimmed line is an Abaqus comment (`**`).
pub fn is_comment(line: &str) -> bool {
    line.starts_with("**")
}

fn parse_header(header: &str, line: usize) -> Result<(String, Vec<Parameter>), ParseError> {
    let fields = split_header_fields(header);
    let keyword_raw = fields.first().map(|s| s.as_str()).unwrap_or("").trim();
    if keyword_raw.is_empty() {
        return Err(ParseError {
            line,
            message: "empty card keyword".to_string(),
        });
    }
    let keyword = keyword_raw.to_ascii_uppercase();
    let mut parameters = Vec::new();

    for part in fields.iter().skip(1) {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        if let Some((k, v)) = item.split_once('=') {
            parameters.push(Parameter {
                key: k.trim().to_ascii_uppercase(),
                value: Some(v.trim().to_string()),
            });
        } else {
            parameters.push(Parameter {
                key: item.to_ascii_uppercase(),
                value: None,
            });
        }
    }

    Ok((keyword, parameters))
}

fn split_header_fields(header: &str) -> Vec<String> {
    let mut fields = Vec::<String>::new();
    let mut current = String::new();
    let mut in_single = false;
    let mut in_double = false;

    for ch in header.chars() {
        match ch {
            '\'' if !in_double => {
                in_single = !in_single;
                current.push(ch);
            }
            '"' if !in_single => {
                in_double = !in_double;
                current.push(ch);
            }
            ',' if !in_single && !in_double => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

fn normalized_keyword(keyword: &str) -> String {
    keyword
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect::<String>()
        .to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_cards_and_data() {
        let src = r#"
** comment
*Heading
My model
*Node
1, 0., 0., 0.
2, 1., 0., 0.
*Element, type=C3D8R
1, 1, 2, 3, 4, 5, 6, 7, 8
"#;

        let deck = Deck::parse_str(src).expect("parser should succeed");
        assert_eq!(deck.cards.len(), 3);
        assert_eq!(deck.cards[1].keyword, "NODE");
        assert_eq!(deck.cards[1].data_lines.len(), 2);
        assert_eq!(deck.cards[2].keyword, "ELEMENT");
        assert_eq!(deck.cards[2].parameter("type"), Some("C3D8R"));
    }

    #[test]
    fn parses_header_continuation() {
        let src = r#"
*Step, name=Load, nlgeom=YES
, inc=100
*Static
1., 1.
"#;

        let deck = Deck::parse_str(src).expect("parser should succeed");
        assert_eq!(deck.cards.len(), 2);
        assert_eq!(deck.cards[0].keyword, "STEP");
        assert_eq!(deck.cards[0].parameter("INC"), Some("100"));
        assert!(deck.cards[0].has_parameter("nlgeom"));
    }

    #[test]
    fn fails_on_orphan_data_before_first_card() {
        let src = "1,2,3\n*Node\n1,0,0,0\n";
        let err = Deck::parse_str(src).expect_err("should fail");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn keeps_raw_lines_and_card_spans() {
        let src = "*Heading\r\ntitle\r\n*Part, name=A\n** inside\n*End Part\n";
        let deck = Deck::parse_str(src).expect("parser should succeed");
        assert_eq!(deck.lines.len(), 5);
        assert_eq!(deck.lines[0], "*Heading\r\n");
        assert_eq!(deck.cards[0].data_lines, vec!["title".to_string()]);

        let part = &deck.cards[1];
        assert_eq!((part.line_start, part.line_end), (3, 4));
        let raw: String = deck.raw_lines(part.line_start, part.line_end).concat();
        assert_eq!(raw, "*Part, name=A\n** inside\n");
    }

    #[test]
    fn raw_lines_are_clamped() {
        let deck = Deck::parse_str("*Heading\n").expect("parser should succeed");
        assert_eq!(deck.raw_lines(1, 10).len(), 1);
        assert!(deck.raw_lines(5, 10).is_empty());
    }

    #[test]
    fn finds_cards_by_normalized_keyword() {
        let src = "*Surface Interaction, name=IntProp-1\n1.,\n*Part, name=p\n*End Part\n";
        let deck = Deck::parse_str(src).expect("parser should succeed");
        let found: Vec<usize> = deck.find_cards("SURFACE_INTERACTION").collect();
        assert_eq!(found, vec![0]);
        assert!(deck.cards[2].is("end part"));
    }

    #[test]
    fn quoted_parameter_values_keep_commas() {
        let src = "*Include, input=\"a,b.inp\"\n";
        let deck = Deck::parse_str(src).expect("parser should succeed");
        assert_eq!(deck.cards[0].parameter("input"), Some("\"a,b.inp\""));
    }
}
