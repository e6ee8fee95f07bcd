use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum AtomicLookupError {
    #[diagnostic(help("double-check for typos, or add a new entry to the atomic database"))]
    #[error("the element {0:?} could not be found in the supplied atomic database")]
    Element(String),

    #[diagnostic(help("double-check for typos, or add a new entry to the atomic database"))]
    #[error("no element named {0:?} could be found in the supplied atomic database")]
    ElementName(String),

    #[diagnostic(help(
        "residue formulae may only contain carbon, hydrogen, nitrogen, oxygen, and sulfur"
    ))]
    #[error("the element {0:?} cannot be part of an elemental composition")]
    Unsupported(String),
}

impl AtomicLookupError {
    pub(crate) fn element(symbol: &str) -> Self {
        Self::Element(symbol.to_owned())
    }

    pub(crate) fn element_name(name: &str) -> Self {
        Self::ElementName(name.to_owned())
    }

    pub(crate) fn unsupported(symbol: &str) -> Self {
        Self::Unsupported(symbol.to_owned())
    }
}
