//! `docfill_core` fills `((Tag))` placeholders in document templates.
//!
//! A template is a `.docx` file (or a plain text file) whose paragraphs
//! contain markers such as `((Objeto))` or `(( Secretaria ))`. The crate can
//! list the tags a template uses, fill a template from a map of values into a
//! new document, and fill every template of a directory in one go.
//!
//! ## Marker grammar
//!
//! A marker is `((`, optional whitespace, a name, optional whitespace, `))`.
//! The name is everything up to the first `))` and never spans a line break.
//! `((` directly followed by a third `(` does not open a marker, so
//! `(((ValorExtenso)))` keeps its outer parentheses and only `ValorExtenso` is
//! filled.
//!
//! ## Modules
//!
//! - [`marker`]: the marker grammar shared by the scanner and the filler.
//! - [`config`]: configuration loading from `docfill.toml`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use docfill_core::SubstitutionMap;
//! use docfill_core::fill;
//! use docfill_core::scan;
//!
//! let template = Path::new("templates/dfd.docx");
//! println!("{:?}", scan(template));
//!
//! let data: SubstitutionMap = [("Objeto", "Aquisição de material")].into_iter().collect();
//! fill(template, &data, Path::new("generated/dfd.docx")).unwrap();
//! ```

pub use batch::*;
pub use config::*;
pub use data::*;
pub use document::*;
pub use docx::DocxDocument;
pub use error::*;
pub use filler::*;
pub use scanner::*;
pub use substitution::*;

mod batch;
pub mod config;
mod data;
mod document;
mod docx;
#[allow(unused_assignments)]
mod error;
mod filler;
pub mod marker;
mod scanner;
mod substitution;

#[cfg(test)]
mod __fixtures;
