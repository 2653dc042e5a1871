//! Fluent configuration of a [`Template`].
//!
//! A [`TemplateBuilder`] accumulates columns, a projector and a delimiter,
//! then [`build`](TemplateBuilder::build) validates and freezes them.
//! `build` takes the builder by value, so it cannot be reused afterwards.

use std::sync::Arc;

use crate::column::{Column, CsvRecord};
use crate::error::{BoxError, Result, TemplateError};
use crate::options::{LineEnding, TemplateOptions, DEFAULT_DELIMITER};
use crate::row::{FallibleRows, OwnedRows, Row, Rows};
use crate::template::{Projector, Template};

/// Builder for [`Template`] instances.
///
/// `D` is the document handed to the renderer, `R` the record behind each
/// output row. `D` may be unsized, so `[R]` works as a document type.
///
/// # Example
///
/// ```
/// use fluent_csv::{Column, LineEnding, TemplateBuilder};
///
/// struct Record { id: u32, name: String }
/// struct Report { items: Vec<Record> }
///
/// let template = TemplateBuilder::<Report, Record>::create()
///     .add_columns(|columns| {
///         columns.push(Column::new("Id", |r: &Record| r.id));
///         columns.push(Column::field("Name", |r: &Record| &r.name));
///     })
///     .with_projector(|report| Box::new(report.items.iter()))
///     .with_delimiter(";")
///     .with_line_ending(LineEnding::Lf)
///     .build()
///     .unwrap();
///
/// assert_eq!(template.headers(), ["Id", "Name"]);
/// ```
pub struct TemplateBuilder<D: ?Sized, R> {
    columns: Vec<Column<R>>,
    projector: Option<Projector<D, R>>,
    delimiter: String,
    line_ending: LineEnding,
}

impl<D: ?Sized, R: 'static> TemplateBuilder<D, R> {
    /// Begin configuring a template for documents of type `D`.
    pub fn create() -> Self {
        TemplateBuilder {
            columns: Vec::new(),
            projector: None,
            delimiter: DEFAULT_DELIMITER.to_string(),
            line_ending: LineEnding::native(),
        }
    }

    /// Append columns through a supplier closure.
    ///
    /// The closure receives the column list built so far; columns keep the
    /// order in which they are pushed, across any number of calls.
    pub fn add_columns<F>(mut self, supplier: F) -> Self
    where
        F: FnOnce(&mut Vec<Column<R>>),
    {
        supplier(&mut self.columns);
        self
    }

    /// Append a single column.
    pub fn add_column(mut self, column: Column<R>) -> Self {
        self.columns.push(column);
        self
    }

    /// Append columns from an iterator.
    pub fn columns(mut self, columns: impl IntoIterator<Item = Column<R>>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Append the columns the record type declares for itself.
    pub fn add_record_columns(self) -> Self
    where
        R: CsvRecord,
    {
        self.columns(R::csv_columns())
    }

    /// Set how a document turns into its row sequence. Last call wins.
    ///
    /// The returned iterator borrows rows from the document and is consumed
    /// once, in order, while rendering.
    pub fn with_projector<F>(self, projector: F) -> Self
    where
        F: for<'a> Fn(&'a D) -> Rows<'a, R> + Send + Sync + 'static,
    {
        self.with_fallible_projector(move |document| {
            Box::new(projector(document).map(|r| Ok::<_, BoxError>(Row::Borrowed(r))))
        })
    }

    /// Like [`with_projector`](Self::with_projector), for rows computed from
    /// the document rather than stored in it.
    ///
    /// ```
    /// use fluent_csv::{Column, LineEnding, TemplateBuilder};
    ///
    /// struct Range { n: u32 }
    ///
    /// let template = TemplateBuilder::<Range, u32>::create()
    ///     .add_column(Column::new("N", |n: &u32| *n))
    ///     .with_owned_projector(|doc| Box::new(0..doc.n))
    ///     .with_line_ending(LineEnding::Lf)
    ///     .build()
    ///     .unwrap();
    ///
    /// let csv = template.render_to_string(&Range { n: 2 }).unwrap();
    /// assert_eq!(csv, "sep=,\n\"N\"\n\"0\"\n\"1\"\n");
    /// ```
    pub fn with_owned_projector<F>(self, projector: F) -> Self
    where
        F: for<'a> Fn(&'a D) -> OwnedRows<'a, R> + Send + Sync + 'static,
    {
        self.with_fallible_projector(move |document| {
            Box::new(projector(document).map(|r| Ok::<_, BoxError>(Row::Owned(r))))
        })
    }

    /// Set a row source that can fail part way through.
    ///
    /// An `Err` item aborts the render with [`TemplateError::Projection`];
    /// rows written before it are kept.
    pub fn with_fallible_projector<F>(mut self, projector: F) -> Self
    where
        F: for<'a> Fn(&'a D) -> FallibleRows<'a, R> + Send + Sync + 'static,
    {
        let projector: Projector<D, R> = Arc::new(projector);
        self.projector = Some(projector);
        self
    }

    /// Set the column separator. Last call wins; checked at build time.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Set the line terminator.
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Apply delimiter and line ending from a deserialized options value.
    pub fn with_options(self, options: TemplateOptions) -> Self {
        self.with_delimiter(options.delimiter)
            .with_line_ending(options.line_ending)
    }

    /// Validate the configuration and freeze it into a [`Template`].
    ///
    /// Fails with [`TemplateError::NoColumns`], [`TemplateError::EmptyDelimiter`]
    /// or [`TemplateError::NoProjector`], checked in that order.
    pub fn build(self) -> Result<Template<D, R>> {
        if self.columns.is_empty() {
            return Err(TemplateError::NoColumns);
        }
        if self.delimiter.is_empty() {
            return Err(TemplateError::EmptyDelimiter);
        }
        let projector = self.projector.ok_or(TemplateError::NoProjector)?;

        let (headers, mappers) = self.columns.into_iter().map(Column::into_parts).unzip();
        Ok(Template::new(
            headers,
            mappers,
            projector,
            self.delimiter,
            self.line_ending,
        ))
    }
}

impl<R: Sync + 'static> TemplateBuilder<[R], R> {
    /// Begin configuring a template whose document is the row slice itself.
    ///
    /// The identity projection is already in place.
    pub fn create_for_rows() -> Self {
        Self::create().with_identity_projection()
    }

    /// Render the document's rows as they are.
    pub fn with_identity_projection(self) -> Self {
        self.with_projector(|rows: &[R]| Box::new(rows.iter()))
    }
}

impl<R: Sync + 'static> TemplateBuilder<Vec<R>, R> {
    /// Render the document's rows as they are.
    pub fn with_identity_projection(self) -> Self {
        self.with_projector(|rows: &Vec<R>| Box::new(rows.iter()))
    }
}

/// Shorthand for [`TemplateBuilder::create_for_rows`].
pub fn create_for_rows<R: Sync + 'static>() -> TemplateBuilder<[R], R> {
    TemplateBuilder::create_for_rows()
}
