//! The frozen template and its renderers.
//!
//! Output layout, one line each:
//!
//! ```text
//! sep=<delimiter>
//! "<header 1>"<delimiter>"<header 2>"...
//! "<cell 1>"<delimiter>"<cell 2>"...      (one line per projected row)
//! ```
//!
//! Every header and cell is quoted unconditionally; embedded double quotes are
//! doubled. Rows are projected and mapped in order on the calling task, and
//! the only suspension points are writes, flushes and the final sync.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{debug, trace, warn};

use crate::column::{map_cell, Mapper};
use crate::error::{Result, TemplateError};
use crate::options::LineEnding;
use crate::row::FallibleRows;

pub(crate) type Projector<D, R> = Arc<dyn for<'a> Fn(&'a D) -> FallibleRows<'a, R> + Send + Sync>;

/// Outcome of a successful render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Number of data rows written, excluding the hint and header lines.
    pub rows: usize,
}

/// Wrap a value in double quotes, doubling any quote inside it.
///
/// ```
/// assert_eq!(fluent_csv::quote_cell(r#"Bruce "Boss""#), r#""Bruce ""Boss""""#);
/// ```
pub fn quote_cell(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    push_quoted(&mut quoted, value);
    quoted
}

fn push_quoted(line: &mut String, value: &str) {
    line.push('"');
    line.push_str(&value.replace('"', "\"\""));
    line.push('"');
}

/// An immutable CSV template, produced by
/// [`TemplateBuilder::build`](crate::TemplateBuilder::build).
///
/// Cloning is cheap and shares the mappers. A template can render any number
/// of documents, including concurrently, as long as each render targets its
/// own destination.
pub struct Template<D: ?Sized, R> {
    inner: Arc<Inner<D, R>>,
}

struct Inner<D: ?Sized, R> {
    headers: Vec<String>,
    mappers: Vec<Mapper<R>>,
    projector: Projector<D, R>,
    delimiter: String,
    line_ending: LineEnding,
}

impl<D: ?Sized, R> Template<D, R> {
    pub(crate) fn new(
        headers: Vec<String>,
        mappers: Vec<Mapper<R>>,
        projector: Projector<D, R>,
        delimiter: String,
        line_ending: LineEnding,
    ) -> Self {
        debug_assert_eq!(headers.len(), mappers.len());
        Template {
            inner: Arc::new(Inner {
                headers,
                mappers,
                projector,
                delimiter,
                line_ending,
            }),
        }
    }

    /// Header names in column order.
    pub fn headers(&self) -> &[String] {
        &self.inner.headers
    }

    pub fn column_count(&self) -> usize {
        self.inner.headers.len()
    }

    pub fn delimiter(&self) -> &str {
        &self.inner.delimiter
    }

    pub fn line_ending(&self) -> LineEnding {
        self.inner.line_ending
    }

    /// Render a document into a string.
    ///
    /// Produces exactly the bytes [`render_to_file`](Self::render_to_file)
    /// would write.
    ///
    /// ```
    /// use fluent_csv::{create_for_rows, Column, LineEnding};
    ///
    /// let template = create_for_rows::<(u32, &'static str)>()
    ///     .add_column(Column::new("Id", |r: &(u32, &'static str)| r.0))
    ///     .add_column(Column::new("Name", |r: &(u32, &'static str)| r.1))
    ///     .with_delimiter(";")
    ///     .with_line_ending(LineEnding::Lf)
    ///     .build()
    ///     .unwrap();
    ///
    /// let csv = template.render_to_string(&[(1, "Bob")]).unwrap();
    /// assert_eq!(csv, "sep=;\n\"Id\";\"Name\"\n\"1\";\"Bob\"\n");
    /// ```
    pub fn render_to_string(&self, document: &D) -> Result<String> {
        let mut output = self.delimiter_hint();
        output.push_str(&self.header_line());
        for (row, item) in (self.inner.projector)(document).enumerate() {
            let record = item.map_err(|source| TemplateError::Projection { row, source })?;
            output.push_str(&self.record_line(&record, row)?);
        }
        Ok(output)
    }

    /// Render a document to `path`, creating or truncating the file.
    ///
    /// The parent directory must already exist. Returns once every byte has
    /// been flushed and synced. A failure part way through leaves the lines
    /// written so far on disk.
    ///
    /// The returned future is `Send` when `D` and `R` are `Sync`.
    pub async fn render_to_file(
        &self,
        path: impl AsRef<Path>,
        document: &D,
    ) -> Result<RenderSummary> {
        self.render_file(path.as_ref(), document, None).await
    }

    /// Like [`render_to_file`](Self::render_to_file), checking `cancelled`
    /// once before each data row.
    ///
    /// When the flag is raised the lines already written are flushed and the
    /// render stops with [`TemplateError::Cancelled`].
    pub async fn render_to_file_cancellable(
        &self,
        path: impl AsRef<Path>,
        document: &D,
        cancelled: &AtomicBool,
    ) -> Result<RenderSummary> {
        self.render_file(path.as_ref(), document, Some(cancelled)).await
    }

    /// Render a document into any async sink.
    ///
    /// The sink is flushed but not shut down, also when rendering fails.
    pub async fn render_to_writer<W>(&self, writer: &mut W, document: &D) -> Result<RenderSummary>
    where
        W: AsyncWrite + Unpin,
    {
        self.write_document(writer, document, None).await
    }

    async fn render_file(
        &self,
        path: &Path,
        document: &D,
        cancelled: Option<&AtomicBool>,
    ) -> Result<RenderSummary> {
        debug!(
            path = %path.display(),
            columns = self.column_count(),
            delimiter = %self.inner.delimiter,
            "rendering csv template"
        );

        let file = File::create(path).await?;
        let mut writer = BufWriter::new(file);
        let summary = self.write_document(&mut writer, document, cancelled).await?;
        writer.into_inner().sync_all().await?;

        debug!(path = %path.display(), rows = summary.rows, "csv template rendered");
        Ok(summary)
    }

    async fn write_document<W>(
        &self,
        writer: &mut W,
        document: &D,
        cancelled: Option<&AtomicBool>,
    ) -> Result<RenderSummary>
    where
        W: AsyncWrite + Unpin,
    {
        match self.write_rows(writer, document, cancelled).await {
            Ok(rows) => {
                writer.flush().await?;
                Ok(RenderSummary { rows })
            }
            Err(err) => {
                // Lines accepted before the failure stay in the destination.
                if let Err(flush_err) = writer.flush().await {
                    warn!(error = %flush_err, "failed to flush partial csv output");
                }
                Err(err)
            }
        }
    }

    async fn write_rows<W>(
        &self,
        writer: &mut W,
        document: &D,
        cancelled: Option<&AtomicBool>,
    ) -> Result<usize>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(self.delimiter_hint().as_bytes()).await?;
        writer.write_all(self.header_line().as_bytes()).await?;

        let mut rows = 0;
        for item in (self.inner.projector)(document) {
            if cancelled.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
                warn!(rows_written = rows, "csv render cancelled");
                return Err(TemplateError::Cancelled { rows_written: rows });
            }
            let line = match item {
                Ok(record) => self.record_line(&record, rows)?,
                Err(source) => return Err(TemplateError::Projection { row: rows, source }),
            };
            writer.write_all(line.as_bytes()).await?;
            trace!(row = rows, "wrote csv row");
            rows += 1;
        }
        Ok(rows)
    }

    fn delimiter_hint(&self) -> String {
        format!(
            "sep={}{}",
            self.inner.delimiter,
            self.inner.line_ending.as_str()
        )
    }

    fn header_line(&self) -> String {
        self.join_line(self.inner.headers.iter().map(String::as_str))
    }

    fn record_line(&self, record: &R, row: usize) -> Result<String> {
        let cells = self
            .inner
            .headers
            .iter()
            .zip(&self.inner.mappers)
            .map(|(header, mapper)| map_cell(header, mapper, record, row))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.join_line(cells.iter().map(String::as_str)))
    }

    fn join_line<'a>(&self, cells: impl Iterator<Item = &'a str>) -> String {
        let mut line = String::new();
        for (i, cell) in cells.enumerate() {
            if i > 0 {
                line.push_str(&self.inner.delimiter);
            }
            push_quoted(&mut line, cell);
        }
        line.push_str(self.inner.line_ending.as_str());
        line
    }
}

impl<D: ?Sized, R> Clone for Template<D, R> {
    fn clone(&self) -> Self {
        Template {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: ?Sized, R> fmt::Debug for Template<D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("headers", &self.inner.headers)
            .field("delimiter", &self.inner.delimiter)
            .field("line_ending", &self.inner.line_ending)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_for_rows, Column, TemplateBuilder};

    struct Record {
        id: u32,
        name: String,
    }

    fn record(id: u32, name: &str) -> Record {
        Record {
            id,
            name: name.to_string(),
        }
    }

    fn template(delimiter: &str) -> Template<[Record], Record> {
        create_for_rows::<Record>()
            .add_columns(|columns| {
                columns.push(Column::new("Id", |r: &Record| r.id));
                columns.push(Column::field("Name", |r: &Record| &r.name));
            })
            .with_delimiter(delimiter)
            .with_line_ending(LineEnding::Lf)
            .build()
            .unwrap()
    }

    #[test]
    fn quoting_wraps_and_doubles() {
        assert_eq!(quote_cell(""), "\"\"");
        assert_eq!(quote_cell("plain"), "\"plain\"");
        assert_eq!(quote_cell("a,b;c"), "\"a,b;c\"");
        assert_eq!(quote_cell("\""), "\"\"\"\"");
        assert_eq!(quote_cell("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn delimiter_hint_and_header() {
        let template = template(";");
        assert_eq!(template.delimiter_hint(), "sep=;\n");
        assert_eq!(template.header_line(), "\"Id\";\"Name\"\n");
    }

    #[test]
    fn multi_character_delimiter() {
        let template = template("||");
        let output = template.render_to_string(&[record(1, "a")]).unwrap();
        assert_eq!(output, "sep=||\n\"Id\"||\"Name\"\n\"1\"||\"a\"\n");
    }

    #[test]
    fn render_to_string_escapes_quotes() {
        let rows = vec![record(1, "Bob"), record(2, "Bruce \"Boss\" Springsteen")];
        let output = template(";").render_to_string(&rows).unwrap();
        assert_eq!(
            output,
            "sep=;\n\"Id\";\"Name\"\n\"1\";\"Bob\"\n\"2\";\"Bruce \"\"Boss\"\" Springsteen\"\n"
        );
    }

    #[test]
    fn crlf_line_ending() {
        let template = create_for_rows::<Record>()
            .add_column(Column::new("Id", |r: &Record| r.id))
            .with_line_ending(LineEnding::CrLf)
            .build()
            .unwrap();
        let output = template.render_to_string(&[record(5, "x")]).unwrap();
        assert_eq!(output, "sep=,\r\n\"Id\"\r\n\"5\"\r\n");
    }

    #[test]
    fn headers_are_quoted_too() {
        let template = TemplateBuilder::<[Record], Record>::create_for_rows()
            .add_column(Column::new("say \"id\"", |r: &Record| r.id))
            .with_line_ending(LineEnding::Lf)
            .build()
            .unwrap();
        assert_eq!(template.header_line(), "\"say \"\"id\"\"\"\n");
    }

    #[test]
    fn null_value_stops_render() {
        let template = create_for_rows::<Record>()
            .add_column(Column::optional("Name", |r: &Record| {
                (!r.name.is_empty()).then(|| r.name.clone())
            }))
            .build()
            .unwrap();
        let err = template
            .render_to_string(&[record(1, "a"), record(2, "")])
            .unwrap_err();
        assert!(matches!(err, TemplateError::NullValue { row: 1, .. }));
    }

    #[test]
    fn clone_and_debug() {
        let template = template(",");
        let copy = template.clone();
        assert_eq!(copy.headers(), template.headers());
        let debug = format!("{copy:?}");
        assert!(debug.contains("Name"));
    }

    #[tokio::test]
    async fn render_to_writer_keeps_prefix_on_failure() {
        let template = create_for_rows::<Record>()
            .add_column(Column::fallible("Name", |r: &Record| {
                if r.name.is_empty() {
                    Err("blank")
                } else {
                    Ok(r.name.clone())
                }
            }))
            .with_line_ending(LineEnding::Lf)
            .build()
            .unwrap();

        let mut sink = BufWriter::new(Vec::new());
        let err = template
            .render_to_writer(&mut sink, &[record(1, "a"), record(2, "")])
            .await
            .unwrap_err();

        assert!(matches!(err, TemplateError::Mapping { row: 1, .. }));
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "sep=,\n\"Name\"\n\"a\"\n"
        );
    }

    #[tokio::test]
    async fn documents_need_not_be_sync() {
        use std::cell::RefCell;

        struct Journal {
            entries: RefCell<Vec<Record>>,
        }

        let template = TemplateBuilder::<Journal, Record>::create()
            .add_column(Column::field("Name", |r: &Record| &r.name))
            .with_owned_projector(|journal| {
                Box::new(journal.entries.borrow_mut().drain(..).collect::<Vec<_>>().into_iter())
            })
            .with_line_ending(LineEnding::Lf)
            .build()
            .unwrap();
        let journal = Journal {
            entries: RefCell::new(vec![record(1, "a")]),
        };

        let mut buffer: Vec<u8> = Vec::new();
        template.render_to_writer(&mut buffer, &journal).await.unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "sep=,\n\"Name\"\n\"a\"\n");
        assert!(journal.entries.borrow().is_empty());
    }

    #[tokio::test]
    async fn render_to_writer_matches_string() {
        let rows = vec![record(1, "a"), record(2, "b")];
        let template = template(",");

        let mut buffer: Vec<u8> = Vec::new();
        let summary = template.render_to_writer(&mut buffer, &rows).await.unwrap();

        assert_eq!(summary.rows, 2);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            template.render_to_string(&rows).unwrap()
        );
    }
}
