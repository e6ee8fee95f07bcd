use elemental::ElementalError;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::ChainSlot;

pub type Result<T, E = Box<MabscaleError>> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum MabscaleError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    UnknownResidue(#[from] UnknownResidueError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Elemental(#[from] ElementalError),
}

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
#[error("the residue {residue:?} at position {position} of {slot} is not a known amino acid")]
#[diagnostic(help(
    "sequences may only contain the one-letter codes of the amino acids in the residue database"
))]
pub struct UnknownResidueError {
    pub slot: ChainSlot,
    pub residue: char,
    /// Counted from 1
    pub position: usize,
    #[source_code]
    sequence: String,
    #[label("unknown residue")]
    span: SourceSpan,
}

impl UnknownResidueError {
    /// `offset` is the byte offset of the unknown residue within `sequence`
    pub(crate) fn new(slot: ChainSlot, sequence: &str, offset: usize, residue: char) -> Self {
        let position = sequence[..offset].chars().count() + 1;
        Self {
            slot,
            residue,
            position,
            sequence: sequence.to_owned(),
            span: (offset, residue.len_utf8()).into(),
        }
    }
}

impl From<UnknownResidueError> for Box<MabscaleError> {
    fn from(error: UnknownResidueError) -> Self {
        Box::new(error.into())
    }
}

impl From<Box<ElementalError>> for Box<MabscaleError> {
    fn from(error: Box<ElementalError>) -> Self {
        Box::new((*error).into())
    }
}
