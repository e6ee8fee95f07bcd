use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum CompositionError {
    #[diagnostic(help(
        "formulae are written as element symbols, each optionally followed by a count, like C6H12O6"
    ))]
    #[error("failed to parse {formula:?} as a chemical formula")]
    Unparsed {
        #[source_code]
        formula: String,
        #[label("expected an element symbol here")]
        span: SourceSpan,
    },
}

impl CompositionError {
    pub(crate) fn unparsed(formula: &str, rest: &str) -> Self {
        let offset = formula.len() - rest.len();
        Self::Unparsed {
            formula: formula.to_owned(),
            span: (offset, rest.len()).into(),
        }
    }
}
