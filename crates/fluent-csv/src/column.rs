//! Column definitions: a header paired with a mapper.
//!
//! A mapper is a pure function from one record to the text of one cell. The
//! constructors on [`Column`] cover the common shapes:
//!
//! | Constructor | Mapper returns | Missing value |
//! |-------------|----------------|---------------|
//! | [`Column::new`] | any [`CellValue`] | n/a |
//! | [`Column::field`] | a borrowed [`CellValue`] | n/a |
//! | [`Column::or_empty`] | `Option<impl CellValue>` | empty cell |
//! | [`Column::optional`] | `Option<impl CellValue>` | [`TemplateError::NullValue`] |
//! | [`Column::fallible`] | `Result<impl CellValue, E>` | [`TemplateError::Mapping`] on `Err` |

use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, Result, TemplateError};

/// What a mapper hands back to the renderer.
///
/// `Ok(None)` means the mapper produced no string at all.
pub type CellResult = std::result::Result<Option<String>, BoxError>;

pub(crate) type Mapper<R> = Arc<dyn Fn(&R) -> CellResult + Send + Sync>;

/// Values that can be written into a cell.
pub trait CellValue {
    fn to_cell(&self) -> String;
}

impl<T: fmt::Display + ?Sized> CellValue for T {
    fn to_cell(&self) -> String {
        self.to_string()
    }
}

/// Record types that declare their own columns.
///
/// This is the hand-written counterpart of a derive: implement it once and
/// pull the columns in with
/// [`TemplateBuilder::add_record_columns`](crate::TemplateBuilder::add_record_columns).
///
/// ```
/// use fluent_csv::{Column, CsvRecord};
///
/// struct Track {
///     id: u32,
///     title: String,
/// }
///
/// impl CsvRecord for Track {
///     fn csv_columns() -> Vec<Column<Self>> {
///         vec![
///             Column::new("Id", |t: &Track| t.id),
///             Column::field("Title", |t: &Track| &t.title),
///         ]
///     }
/// }
///
/// assert_eq!(Track::csv_columns().len(), 2);
/// ```
pub trait CsvRecord: Sized {
    fn csv_columns() -> Vec<Column<Self>>;
}

/// A column: header text plus the mapper that fills its cells.
pub struct Column<R> {
    header: String,
    mapper: Mapper<R>,
}

impl<R: 'static> Column<R> {
    /// Column whose mapper always produces a value.
    pub fn new<F, V>(header: impl Into<String>, map: F) -> Self
    where
        F: Fn(&R) -> V + Send + Sync + 'static,
        V: CellValue + 'static,
    {
        Self::from_mapper(header, move |record: &R| Ok(Some(map(record).to_cell())))
    }

    /// Column reading a field by reference, without cloning it first.
    pub fn field<F, V>(header: impl Into<String>, map: F) -> Self
    where
        F: for<'a> Fn(&'a R) -> &'a V + Send + Sync + 'static,
        V: CellValue + ?Sized + 'static,
    {
        Self::from_mapper(header, move |record: &R| Ok(Some(map(record).to_cell())))
    }

    /// Column where a missing value renders as an empty cell.
    pub fn or_empty<F, V>(header: impl Into<String>, map: F) -> Self
    where
        F: Fn(&R) -> Option<V> + Send + Sync + 'static,
        V: CellValue + 'static,
    {
        Self::from_mapper(header, move |record: &R| {
            Ok(Some(map(record).map(|v| v.to_cell()).unwrap_or_default()))
        })
    }

    /// Column where a missing value is an error.
    ///
    /// Rendering fails with [`TemplateError::NullValue`] when the mapper
    /// returns `None`.
    pub fn optional<F, V>(header: impl Into<String>, map: F) -> Self
    where
        F: Fn(&R) -> Option<V> + Send + Sync + 'static,
        V: CellValue + 'static,
    {
        Self::from_mapper(header, move |record: &R| Ok(map(record).map(|v| v.to_cell())))
    }

    /// Column whose mapper can fail.
    ///
    /// An `Err` aborts the render with [`TemplateError::Mapping`].
    pub fn fallible<F, V, E>(header: impl Into<String>, map: F) -> Self
    where
        F: Fn(&R) -> std::result::Result<V, E> + Send + Sync + 'static,
        V: CellValue + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::from_mapper(header, move |record: &R| match map(record) {
            Ok(value) => Ok(Some(value.to_cell())),
            Err(err) => Err(err.into()),
        })
    }

    /// Column from a raw mapper returning a [`CellResult`].
    pub fn from_mapper<F>(header: impl Into<String>, mapper: F) -> Self
    where
        F: Fn(&R) -> CellResult + Send + Sync + 'static,
    {
        Column {
            header: header.into(),
            mapper: Arc::new(mapper),
        }
    }
}

impl<R> Column<R> {
    /// The header text.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Apply the mapper to a record. `row` only labels errors.
    pub fn cell(&self, record: &R, row: usize) -> Result<String> {
        map_cell(&self.header, &self.mapper, record, row)
    }

    pub(crate) fn into_parts(self) -> (String, Mapper<R>) {
        (self.header, self.mapper)
    }
}

pub(crate) fn map_cell<R>(
    header: &str,
    mapper: &Mapper<R>,
    record: &R,
    row: usize,
) -> Result<String> {
    match mapper(record) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(TemplateError::NullValue {
            column: header.to_string(),
            row,
        }),
        Err(source) => Err(TemplateError::Mapping {
            column: header.to_string(),
            row,
            source,
        }),
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Column {
            header: self.header.clone(),
            mapper: Arc::clone(&self.mapper),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}
