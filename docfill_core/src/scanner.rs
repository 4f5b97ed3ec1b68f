use std::collections::HashSet;
use std::path::Path;

use crate::DocfillResult;
use crate::Document;
use crate::SubstitutionMap;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::marker::find_markers;

/// Collect the distinct tag names found in `texts`, in order of first
/// appearance. Markers with an empty name (`(())`) are not tags.
pub fn scan_texts<I, S>(texts: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut seen = HashSet::new();
	let mut tags = Vec::new();

	for text in texts {
		for marker in find_markers(text.as_ref()) {
			if marker.name.is_empty() {
				continue;
			}
			if seen.insert(marker.name.to_string()) {
				tags.push(marker.name.to_string());
			}
		}
	}

	tags
}

/// Distinct tag names of an already loaded document.
pub fn scan_document(document: &Document) -> Vec<String> {
	scan_texts(document.paragraph_texts())
}

/// Load the template at `path` and return its tag names, surfacing read
/// errors.
pub fn try_scan(path: &Path) -> DocfillResult<Vec<String>> {
	try_scan_with_limit(path, DEFAULT_MAX_FILE_SIZE)
}

pub fn try_scan_with_limit(path: &Path, max_file_size: u64) -> DocfillResult<Vec<String>> {
	let document = Document::load_with_limit(path, max_file_size)?;
	let tags = scan_document(&document);
	tracing::debug!(path = %path.display(), tags = tags.len(), "scanned template");
	Ok(tags)
}

/// Best-effort discovery of the tag names used by the template at `path`.
///
/// Never fails: a template that is missing, unreadable or in an unknown
/// format yields an empty list. Use [`try_scan`] to see the reason. Empty
/// markers such as `(())` or `((  ))` are never reported, so the result has
/// no `""` entry.
pub fn scan(path: &Path) -> Vec<String> {
	scan_with_limit(path, DEFAULT_MAX_FILE_SIZE)
}

/// [`scan`] with a custom size limit. A template above `max_file_size` yields
/// an empty list.
pub fn scan_with_limit(path: &Path, max_file_size: u64) -> Vec<String> {
	try_scan_with_limit(path, max_file_size).unwrap_or_else(|e| {
		tracing::warn!(path = %path.display(), error = %e, "could not scan template");
		Vec::new()
	})
}

/// Tags used by the template at `path` that have no value in `data`, in
/// order of first appearance.
pub fn missing_tags(path: &Path, data: &SubstitutionMap) -> DocfillResult<Vec<String>> {
	missing_tags_with_limit(path, data, DEFAULT_MAX_FILE_SIZE)
}

pub fn missing_tags_with_limit(
	path: &Path,
	data: &SubstitutionMap,
	max_file_size: u64,
) -> DocfillResult<Vec<String>> {
	let tags = try_scan_with_limit(path, max_file_size)?;
	Ok(tags
		.into_iter()
		.filter(|tag| !data.contains_key(tag))
		.collect())
}
