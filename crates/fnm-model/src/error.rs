//! Error types for fnm-model

use fnm_inp::ParseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("deck parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("no fnm part found (expected a part whose name contains 'fnm')")]
    MissingFnmPart,

    #[error("exactly one fnm part is supported, found {0}")]
    MultipleFnmParts(usize),

    #[error("fnm part '{part}' must contain exactly one *Element section, found {count}")]
    ElementSections { part: String, count: usize },

    #[error("fnm part '{0}' has no *Node section")]
    MissingNodes(String),

    #[error("at most one element set (predelam) is supported in the fnm part, found {0}")]
    MultipleElementSets(usize),

    #[error("only an element set named 'predelam' is supported in the fnm part, found '{0}'")]
    UnsupportedElementSet(String),

    #[error("exactly one assembly is supported, found {0}")]
    AssemblyCount(usize),

    #[error("*{keyword} at line {line} has no matching *End {keyword}")]
    Unterminated { keyword: &'static str, line: usize },

    #[error("node labels of the fnm part must run 1..=N in order: expected {expected}, found {found}")]
    NodeNumbering { expected: usize, found: usize },

    #[error("line {line}: {message}")]
    InvalidData { line: usize, message: String },
}

impl ModelError {
    pub(crate) fn invalid_data(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidData {
            line,
            message: message.into(),
        }
    }
}
