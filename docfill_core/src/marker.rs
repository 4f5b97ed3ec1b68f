//! The `((Name))` marker grammar shared by the scanner and the filler.
//!
//! A marker is:
//!
//! ```text
//! "((" (not followed by "(") WS* NAME WS* "))"
//! ```
//!
//! where `NAME` is the shortest run of characters (excluding `\n`) that reaches
//! the first `))`. A third opening parenthesis is never part of the marker, so
//! in `(((Valor)))` the outer pair stays literal text and the tag is `Valor`.
//!
//! Matching is left to right and non-overlapping: once a marker is matched the
//! search resumes after its closing `))`.

use std::ops::Range;

/// Opening delimiter of a marker.
pub const MARKER_OPEN: &str = "((";
/// Closing delimiter of a marker.
pub const MARKER_CLOSE: &str = "))";

/// A single marker occurrence inside a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker<'a> {
	/// The trimmed tag name between the delimiters. May be empty for `(())`.
	pub name: &'a str,
	/// Byte range of the whole marker, delimiters included.
	pub span: Range<usize>,
}

/// Iterator over the markers of a piece of text, created by [`find_markers`].
#[derive(Debug, Clone)]
pub struct Markers<'a> {
	text: &'a str,
	cursor: usize,
}

impl<'a> Iterator for Markers<'a> {
	type Item = Marker<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		while let Some(relative) = self.text[self.cursor..].find(MARKER_OPEN) {
			let start = self.cursor + relative;

			if let Some(marker) = match_marker_at(self.text, start) {
				self.cursor = marker.span.end;
				return Some(marker);
			}

			// `(` is a single byte so `start + 1` is always a char boundary.
			self.cursor = start + 1;
		}

		self.cursor = self.text.len();
		None
	}
}

/// Find every marker in `text`, in order of appearance.
pub fn find_markers(text: &str) -> Markers<'_> {
	Markers { text, cursor: 0 }
}

/// Cheap pre-filter: only text containing `((` can hold a marker.
pub fn has_marker_open(text: &str) -> bool {
	text.contains(MARKER_OPEN)
}

/// Try to match a marker whose opening `((` starts at byte `start`.
fn match_marker_at(text: &str, start: usize) -> Option<Marker<'_>> {
	let after_open = start + MARKER_OPEN.len();
	let rest = &text[after_open..];

	if rest.starts_with('(') {
		return None;
	}

	let content_start = after_open + leading_whitespace_len(rest);
	let close = content_start + text[content_start..].find(MARKER_CLOSE)?;
	let name = text[content_start..close].trim_end();

	if name.contains('\n') {
		return None;
	}

	Some(Marker {
		name,
		span: start..close + MARKER_CLOSE.len(),
	})
}

/// Replace every marker for exactly `name` in `text` with `value`.
///
/// The value is inserted literally and is not searched again. Returns the new
/// text together with the number of replacements made.
pub fn replace_marker(text: &str, name: &str, value: &str) -> (String, usize) {
	let mut result = String::with_capacity(text.len());
	let mut cursor = 0;
	let mut count = 0;

	while let Some(relative) = text[cursor..].find(MARKER_OPEN) {
		let start = cursor + relative;

		match named_marker_end(text, start, name) {
			Some(end) => {
				result.push_str(&text[cursor..start]);
				result.push_str(value);
				cursor = end;
				count += 1;
			}
			None => {
				result.push_str(&text[cursor..=start]);
				cursor = start + 1;
			}
		}
	}

	result.push_str(&text[cursor..]);
	(result, count)
}

/// Match `((<ws>*name<ws>*))` at `start` and return the end offset.
fn named_marker_end(text: &str, start: usize, name: &str) -> Option<usize> {
	let after_open = start + MARKER_OPEN.len();
	let rest = &text[after_open..];

	if rest.starts_with('(') {
		return None;
	}

	let name_start = after_open + leading_whitespace_len(rest);
	let after_name = text[name_start..].strip_prefix(name)?;
	let close_start = name_start + name.len() + leading_whitespace_len(after_name);

	text[close_start..]
		.starts_with(MARKER_CLOSE)
		.then_some(close_start + MARKER_CLOSE.len())
}

fn leading_whitespace_len(text: &str) -> usize {
	text.len() - text.trim_start().len()
}
