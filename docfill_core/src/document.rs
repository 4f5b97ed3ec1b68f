use std::path::Path;

use crate::DocfillError;
use crate::DocfillResult;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::docx::DocxDocument;

/// The container formats a template can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentFormat {
	/// Office Open XML word processing document (`.docx`).
	Docx,
	/// Plain UTF-8 text where every line is a paragraph (`.txt`, `.md`).
	Text,
}

impl DocumentFormat {
	/// Detect the format from the file extension.
	pub fn from_path(path: &Path) -> DocfillResult<Self> {
		let extension = path
			.extension()
			.and_then(|e| e.to_str())
			.unwrap_or("")
			.to_ascii_lowercase();

		match extension.as_str() {
			"docx" => Ok(Self::Docx),
			"txt" | "text" | "md" => Ok(Self::Text),
			other => Err(DocfillError::UnsupportedFormat(other.to_string())),
		}
	}
}

/// An in-memory template: an ordered tree of paragraphs (top-level and inside
/// table cells) whose plain text can be read and overwritten.
///
/// Traversal order is always: top-level paragraphs in document order, then
/// every table's rows top to bottom, cells left to right, and each cell's
/// paragraphs in order.
#[derive(Debug)]
#[non_exhaustive]
pub enum Document {
	Docx(Box<DocxDocument>),
	Text(TextDocument),
}

impl Document {
	/// Load a document using the default size limit.
	pub fn load(path: &Path) -> DocfillResult<Self> {
		Self::load_with_limit(path, DEFAULT_MAX_FILE_SIZE)
	}

	/// Load a document, rejecting files larger than `max_file_size` bytes
	/// before parsing them.
	pub fn load_with_limit(path: &Path, max_file_size: u64) -> DocfillResult<Self> {
		let format = DocumentFormat::from_path(path)?;
		let read_error = |reason: String| {
			DocfillError::DocumentRead {
				path: path.display().to_string(),
				reason,
			}
		};

		let metadata = std::fs::metadata(path).map_err(|e| read_error(e.to_string()))?;
		if !metadata.is_file() {
			return Err(read_error("not a file".to_string()));
		}
		if metadata.len() > max_file_size {
			return Err(DocfillError::FileTooLarge {
				path: path.display().to_string(),
				size: metadata.len(),
				limit: max_file_size,
			});
		}

		let bytes = std::fs::read(path).map_err(|e| read_error(e.to_string()))?;
		tracing::debug!(path = %path.display(), ?format, bytes = bytes.len(), "loading document");

		match format {
			DocumentFormat::Docx => {
				let docx = DocxDocument::from_bytes(&bytes).map_err(read_error)?;
				Ok(Self::Docx(Box::new(docx)))
			}
			DocumentFormat::Text => {
				let content = String::from_utf8(bytes).map_err(|e| read_error(e.to_string()))?;
				Ok(Self::Text(TextDocument::new(&content)))
			}
		}
	}

	pub fn format(&self) -> DocumentFormat {
		match self {
			Self::Docx(_) => DocumentFormat::Docx,
			Self::Text(_) => DocumentFormat::Text,
		}
	}

	/// The plain text of every paragraph, in traversal order. A `.docx`
	/// paragraph split by a hyperlink or another non-run element yields one
	/// text per run group, see [`DocxDocument::paragraph_texts`].
	pub fn paragraph_texts(&self) -> Vec<String> {
		match self {
			Self::Docx(docx) => docx.paragraph_texts(),
			Self::Text(text) => text.paragraph_texts(),
		}
	}

	/// Offer every text of [`Document::paragraph_texts`] to `rewrite` in the
	/// same order. When the callback returns `Some`, that text is replaced.
	/// Returns the number of texts that were rewritten.
	pub fn rewrite_paragraphs<F>(&mut self, rewrite: F) -> usize
	where
		F: FnMut(&str) -> Option<String>,
	{
		match self {
			Self::Docx(docx) => docx.rewrite_paragraphs(rewrite),
			Self::Text(text) => text.rewrite_paragraphs(rewrite),
		}
	}

	/// Serialize the document to `path`, overwriting anything already there.
	pub fn save(self, path: &Path) -> DocfillResult<()> {
		match self {
			Self::Docx(docx) => docx.save(path),
			Self::Text(text) => text.save(path),
		}
	}
}

/// A plain text template. Each line is a paragraph; there are no tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
	lines: Vec<String>,
	trailing_newline: bool,
}

impl TextDocument {
	pub fn new(content: &str) -> Self {
		let trailing_newline = content.ends_with('\n');
		let body = content.strip_suffix('\n').unwrap_or(content);
		let lines = if content.is_empty() {
			Vec::new()
		} else {
			body.split('\n').map(ToString::to_string).collect()
		};

		Self {
			lines,
			trailing_newline,
		}
	}

	pub fn paragraph_texts(&self) -> Vec<String> {
		self.lines.clone()
	}

	pub fn rewrite_paragraphs<F>(&mut self, mut rewrite: F) -> usize
	where
		F: FnMut(&str) -> Option<String>,
	{
		let mut rewritten = 0;
		for line in &mut self.lines {
			if let Some(new_text) = rewrite(line.as_str()) {
				*line = new_text;
				rewritten += 1;
			}
		}
		rewritten
	}

	/// Render the document back to text.
	pub fn content(&self) -> String {
		let mut content = self.lines.join("\n");
		if self.trailing_newline {
			content.push('\n');
		}
		content
	}

	pub fn save(&self, path: &Path) -> DocfillResult<()> {
		std::fs::write(path, self.content()).map_err(|e| {
			DocfillError::DocumentWrite {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})
	}
}
