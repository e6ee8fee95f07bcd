//! Shared plumbing for turning span-labelled validation failures in KDL files into `miette` reports

use knuffel::span::Span;
use miette::{Diagnostic, LabeledSpan, NamedSource};
use thiserror::Error;

pub(crate) type Composition = knuffel::span::Spanned<String, Span>;

pub(crate) trait ValidationErrorKind: Diagnostic + Send + Sync + Sized + 'static {
    fn labels(&self) -> Vec<(&Span, &'static str)>;

    fn finalize(
        self,
        file_kind: &'static str,
        file_name: impl AsRef<str>,
        kdl: impl AsRef<str>,
    ) -> ValidationError<Self> {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        ValidationError {
            file_kind,
            kdl,
            kind: self,
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to validate {file_kind} file")]
pub(crate) struct ValidationError<K: ValidationErrorKind> {
    file_kind: &'static str,
    kdl: NamedSource,
    #[source]
    kind: K,
}

// NOTE: This is manually implemented because the list of labels is dynamic and needs to be extracted from `self.kind`
impl<K: ValidationErrorKind> Diagnostic for ValidationError<K> {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.kdl)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(ValidationErrorKind::labels(&self.kind).into_iter().map(|(s, l)| {
            LabeledSpan::new_with_span(Some(l.to_owned()), s.clone())
        })))
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        Some(&self.kind)
    }
}
