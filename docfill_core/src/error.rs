use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DocfillError {
	#[error(transparent)]
	#[diagnostic(code(docfill::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read document `{path}`: {reason}")]
	#[diagnostic(
		code(docfill::document_read),
		help("check that the file exists and is a valid .docx or plain text document")
	)]
	DocumentRead { path: String, reason: String },

	#[error("failed to write document `{path}`: {reason}")]
	#[diagnostic(code(docfill::document_write))]
	DocumentWrite { path: String, reason: String },

	#[error("unsupported document format: `{0}`")]
	#[diagnostic(
		code(docfill::unsupported_format),
		help("supported formats: docx, txt, md, text")
	)]
	UnsupportedFormat(String),

	#[error("failed to generate document: {source}")]
	#[diagnostic(code(docfill::generation))]
	Generation {
		#[source]
		source: Box<DocfillError>,
	},

	#[error("output path `{0}` is the template itself")]
	#[diagnostic(
		code(docfill::output_is_template),
		help("write the generated document to a different path")
	)]
	OutputIsTemplate(String),

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(docfill::file_too_large),
		help("increase `max_file_size` in docfill.toml")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(docfill::config_parse),
		help("check that docfill.toml is valid TOML with [templates], [output], [data] and/or [values] sections")
	)]
	ConfigParse(String),

	#[error("failed to load data file `{path}`: {reason}")]
	#[diagnostic(code(docfill::data_file))]
	DataFile { path: String, reason: String },

	#[error("unsupported data file format: `{0}`")]
	#[diagnostic(
		code(docfill::unsupported_data_format),
		help("supported formats: text, json, toml, yaml, yml, ini")
	)]
	UnsupportedDataFormat(String),

	#[error("invalid template pattern `{pattern}`: {reason}")]
	#[diagnostic(code(docfill::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("no templates found in `{0}`")]
	#[diagnostic(
		code(docfill::no_templates),
		help("add .docx templates to the directory or adjust [templates] patterns in docfill.toml")
	)]
	NoTemplates(String),

	#[error("template `{template}` references tags with no value: {}", tags.join(", "))]
	#[diagnostic(
		code(docfill::missing_tags),
		help("provide the values with `--set KEY=VALUE` or a `--data` file")
	)]
	MissingTags { template: String, tags: Vec<String> },
}

impl DocfillError {
	/// Wrap any error raised while generating a document so callers only ever
	/// see [`DocfillError::Generation`].
	pub fn generation(source: DocfillError) -> Self {
		match source {
			already @ Self::Generation { .. } => already,
			source => {
				Self::Generation {
					source: Box::new(source),
				}
			}
		}
	}

	/// Returns true if this error came from failing to open or parse a
	/// document.
	pub fn is_read_error(&self) -> bool {
		matches!(
			self,
			Self::DocumentRead { .. } | Self::UnsupportedFormat(_) | Self::FileTooLarge { .. }
		)
	}
}

pub type DocfillResult<T> = Result<T, DocfillError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
