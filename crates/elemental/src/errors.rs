use miette::Diagnostic;
use thiserror::Error;

use crate::{atoms::errors::AtomicLookupError, parsers::errors::CompositionError};

pub type Result<T, E = Box<ElementalError>> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum ElementalError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    AtomicLookup {
        #[from]
        error: AtomicLookupError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Composition {
        #[from]
        error: CompositionError,
    },
}

// NOTE: `Box` is a fundamental type, so these impls are allowed despite `Box` being foreign. They let `?` lift the
// more specific error types straight into this crate's `Result`
macro_rules! boxed_from_impls {
    ($($error_type:ty),+ $(,)?) => {
        $(
            impl From<$error_type> for Box<ElementalError> {
                fn from(error: $error_type) -> Self {
                    Box::new(error.into())
                }
            }
        )+
    };
}

boxed_from_impls!(AtomicLookupError, CompositionError);
