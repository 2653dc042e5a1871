//! # Fluent CSV - Declarative CSV Export Templates
//!
//! `fluent-csv` turns an arbitrary in-memory document into delimited text. A
//! template is configured once with a fluent builder and then reused to render
//! any number of documents.
//!
//! ## Core Concepts
//!
//! - [`Column`]: a header paired with a mapper from one record to one cell
//! - [`TemplateBuilder`]: accumulates columns, a projector and a delimiter
//! - Projector: a function from the document to its lazy row sequence of
//!   borrowed ([`Rows`]), computed ([`OwnedRows`]) or fallible
//!   ([`FallibleRows`]) rows
//! - [`Template`]: the frozen configuration, with async and in-memory renderers
//! - [`TemplateOptions`]: delimiter and line ending, loadable from YAML or JSON
//!
//! ## Output Format
//!
//! ```text
//! sep=;
//! "Id";"Name"
//! "1";"Bob"
//! "2";"Bruce ""Boss"" Springsteen"
//! ```
//!
//! The first line tells spreadsheet applications which separator is in use.
//! Every header and cell is wrapped in double quotes and embedded quotes are
//! doubled, so no other character needs escaping.
//!
//! ## Quick Start
//!
//! ```rust
//! use fluent_csv::{Column, LineEnding, TemplateBuilder};
//!
//! struct Record {
//!     id: u32,
//!     name: String,
//! }
//!
//! struct Report {
//!     items: Vec<Record>,
//! }
//!
//! let template = TemplateBuilder::<Report, Record>::create()
//!     .add_columns(|columns| {
//!         columns.push(Column::new("Id", |r: &Record| r.id));
//!         columns.push(Column::field("Name", |r: &Record| &r.name));
//!     })
//!     .with_projector(|report| Box::new(report.items.iter()))
//!     .with_delimiter(";")
//!     .with_line_ending(LineEnding::Lf)
//!     .build()
//!     .unwrap();
//!
//! let report = Report {
//!     items: vec![
//!         Record { id: 1, name: "Bob".into() },
//!         Record { id: 2, name: "Bruce \"Boss\" Springsteen".into() },
//!     ],
//! };
//!
//! let csv = template.render_to_string(&report).unwrap();
//! assert_eq!(
//!     csv,
//!     "sep=;\n\"Id\";\"Name\"\n\"1\";\"Bob\"\n\"2\";\"Bruce \"\"Boss\"\" Springsteen\"\n"
//! );
//! ```
//!
//! Writing to disk is the same call in async form:
//!
//! ```rust,ignore
//! let summary = template.render_to_file("report.csv", &report).await?;
//! println!("{} rows", summary.rows);
//! ```
//!
//! ## Row Sequences
//!
//! When the document already is the list of rows, skip the projector:
//!
//! ```rust
//! use fluent_csv::{create_for_rows, Column, LineEnding};
//!
//! let template = create_for_rows::<u32>()
//!     .add_column(Column::new("Square", |n: &u32| n * n))
//!     .with_line_ending(LineEnding::Lf)
//!     .build()
//!     .unwrap();
//!
//! let csv = template.render_to_string(&[2, 3]).unwrap();
//! assert_eq!(csv, "sep=,\n\"Square\"\n\"4\"\n\"9\"\n");
//! ```
//!
//! Projected sequences are single-pass: the renderer pulls each row once, in
//! order, and never collects them.

mod builder;
mod column;
mod error;
mod options;
mod row;
mod template;

pub use builder::{create_for_rows, TemplateBuilder};
pub use column::{CellResult, CellValue, Column, CsvRecord};
pub use error::{BoxError, Result, TemplateError};
pub use options::{LineEnding, TemplateOptions, DEFAULT_DELIMITER};
pub use row::{FallibleRows, OwnedRows, Row, Rows};
pub use template::{quote_cell, RenderSummary, Template};
