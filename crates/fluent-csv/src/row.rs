//! Row sequences produced by a projector.
//!
//! A projector hands the renderer a lazy, single-pass iterator. Depending on
//! the builder method it was registered with, the iterator yields:
//!
//! | Builder method | Item | Alias |
//! |----------------|------|-------|
//! | [`with_projector`](crate::TemplateBuilder::with_projector) | `&'a R` | [`Rows`] |
//! | [`with_owned_projector`](crate::TemplateBuilder::with_owned_projector) | `R` | [`OwnedRows`] |
//! | [`with_fallible_projector`](crate::TemplateBuilder::with_fallible_projector) | `Result<Row<'a, R>, BoxError>` | [`FallibleRows`] |
//!
//! All three are normalized to [`FallibleRows`] inside the template. Mappers
//! always see `&R`, whichever way the row was produced.

use std::ops::Deref;

use crate::error::BoxError;

/// Rows borrowed from the document.
pub type Rows<'a, R> = Box<dyn Iterator<Item = &'a R> + Send + 'a>;

/// Rows computed while projecting, such as a `map` over the document.
pub type OwnedRows<'a, R> = Box<dyn Iterator<Item = R> + Send + 'a>;

/// Rows from a source that can fail part way through, such as a cursor.
pub type FallibleRows<'a, R> =
    Box<dyn Iterator<Item = std::result::Result<Row<'a, R>, BoxError>> + Send + 'a>;

/// One projected row, either borrowed from the document or owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row<'a, R> {
    Borrowed(&'a R),
    Owned(R),
}

impl<R> Deref for Row<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        match self {
            Row::Borrowed(record) => record,
            Row::Owned(record) => record,
        }
    }
}

impl<'a, R> From<&'a R> for Row<'a, R> {
    fn from(record: &'a R) -> Self {
        Row::Borrowed(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrowed_and_owned_deref_alike() {
        let stored = String::from("kept");
        let borrowed = Row::from(&stored);
        let owned: Row<'_, String> = Row::Owned("made".to_string());

        assert_eq!(borrowed.len(), 4);
        assert_eq!(&*owned, "made");
        assert_eq!(borrowed, Row::Borrowed(&stored));
    }
}
