use std::path::Path;
use std::path::PathBuf;

use crate::DocfillError;
use crate::DocfillResult;
use crate::Document;
use crate::SubstitutionMap;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::marker::find_markers;
use crate::marker::has_marker_open;
use crate::marker::replace_marker;

/// Summary of a fill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
	/// Number of markers replaced with a value.
	pub substitutions: usize,
	/// Number of paragraphs whose text changed. A `.docx` paragraph counts once
	/// per run group that changed.
	pub paragraphs_rewritten: usize,
	/// Tags with no value in the substitution map, in order of first
	/// appearance. They are left untouched in the output.
	pub unresolved: Vec<String>,
}

impl FillReport {
	/// Returns true if every tag of the template had a value.
	pub fn is_complete(&self) -> bool {
		self.unresolved.is_empty()
	}

	fn note_unresolved(&mut self, name: &str) {
		if !self.unresolved.iter().any(|tag| tag == name) {
			self.unresolved.push(name.to_string());
		}
	}
}

/// Fill the markers of a single paragraph of text.
///
/// Returns `None` when the text has no `((` at all or when nothing was
/// replaced, so callers can leave the paragraph untouched.
fn fill_paragraph(text: &str, data: &SubstitutionMap, report: &mut FillReport) -> Option<String> {
	if !has_marker_open(text) {
		return None;
	}

	let names: Vec<&str> = find_markers(text)
		.map(|marker| marker.name)
		.filter(|name| !name.is_empty())
		.collect();

	let mut result = text.to_string();
	for name in names {
		let Some(value) = data.get(name) else {
			report.note_unresolved(name);
			continue;
		};

		let (replaced, count) = replace_marker(&result, name, value);
		result = replaced;
		report.substitutions += count;
	}

	(result != text).then_some(result)
}

/// Fill every marker of `text` that has a value in `data`.
pub fn fill_text(text: &str, data: &SubstitutionMap) -> String {
	let mut report = FillReport::default();
	fill_paragraph(text, data, &mut report).unwrap_or_else(|| text.to_string())
}

/// Fill an in-memory document. Paragraphs whose text does not change are not
/// rewritten, so their formatting is preserved.
pub fn fill_document(document: &mut Document, data: &SubstitutionMap) -> FillReport {
	let mut report = FillReport::default();
	let rewritten = document.rewrite_paragraphs(|text| fill_paragraph(text, data, &mut report));
	report.paragraphs_rewritten = rewritten;
	report
}

/// Fill the template at `template` with `data` and write the result to
/// `output`. Returns `output` on success.
///
/// Every failure is reported as [`DocfillError::Generation`] wrapping the
/// underlying cause.
pub fn fill(template: &Path, data: &SubstitutionMap, output: &Path) -> DocfillResult<PathBuf> {
	fill_with_report(template, data, output)?;
	Ok(output.to_path_buf())
}

/// Like [`fill`], returning the [`FillReport`] instead of the output path.
pub fn fill_with_report(
	template: &Path,
	data: &SubstitutionMap,
	output: &Path,
) -> DocfillResult<FillReport> {
	fill_with_limit(template, data, output, DEFAULT_MAX_FILE_SIZE)
}

pub fn fill_with_limit(
	template: &Path,
	data: &SubstitutionMap,
	output: &Path,
	max_file_size: u64,
) -> DocfillResult<FillReport> {
	generate(template, data, output, max_file_size).map_err(DocfillError::generation)
}

fn generate(
	template: &Path,
	data: &SubstitutionMap,
	output: &Path,
	max_file_size: u64,
) -> DocfillResult<FillReport> {
	if is_same_path(template, output) {
		return Err(DocfillError::OutputIsTemplate(output.display().to_string()));
	}

	let mut document = Document::load_with_limit(template, max_file_size)?;
	let report = fill_document(&mut document, data);
	save_atomically(document, output)?;

	tracing::info!(
		template = %template.display(),
		output = %output.display(),
		substitutions = report.substitutions,
		unresolved = report.unresolved.len(),
		"generated document"
	);

	Ok(report)
}

pub(crate) fn is_same_path(a: &Path, b: &Path) -> bool {
	match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
		(Ok(a), Ok(b)) => a == b,
		_ => a == b,
	}
}

/// Save to a sibling temporary file first and rename it into place, so a
/// failed save never leaves a partial document at `output`.
fn save_atomically(document: Document, output: &Path) -> DocfillResult<()> {
	let Some(file_name) = output.file_name() else {
		return Err(DocfillError::DocumentWrite {
			path: output.display().to_string(),
			reason: "output path has no file name".to_string(),
		});
	};

	let temp_path = output.with_file_name(format!(
		".{}.tmp-{}",
		file_name.to_string_lossy(),
		std::process::id()
	));

	if let Err(e) = document.save(&temp_path) {
		let _ = std::fs::remove_file(&temp_path);
		return Err(e);
	}

	if let Err(e) = std::fs::rename(&temp_path, output) {
		let _ = std::fs::remove_file(&temp_path);
		return Err(DocfillError::DocumentWrite {
			path: output.display().to_string(),
			reason: e.to_string(),
		});
	}

	Ok(())
}
