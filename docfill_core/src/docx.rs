//! `.docx` adapter built on [`docx_rs`].
//!
//! Only run text is exposed to the rest of the crate. A paragraph is read as a
//! sequence of run groups: each maximal stretch of adjacent runs is one group,
//! and the runs inside a hyperlink form groups of their own. A group's text is
//! the concatenation of its runs (tabs become `\t` and breaks become `\n`).
//!
//! Rewriting a group collapses its runs into a single run that keeps the
//! formatting of the group's first run. Text never moves across a hyperlink,
//! bookmark or any other non-run child, so those stay exactly where they were.
//! A marker split by such a child is therefore not a marker.

use std::path::Path;

use docx_rs::BreakType;
use docx_rs::DocumentChild;
use docx_rs::Docx;
use docx_rs::Paragraph;
use docx_rs::ParagraphChild;
use docx_rs::Run;
use docx_rs::RunChild;
use docx_rs::RunProperty;
use docx_rs::Table;
use docx_rs::TableCellContent;
use docx_rs::TableChild;
use docx_rs::TableRowChild;

use crate::DocfillError;
use crate::DocfillResult;

/// A parsed `.docx` document.
#[derive(Debug)]
pub struct DocxDocument {
	docx: Docx,
}

impl From<Docx> for DocxDocument {
	fn from(docx: Docx) -> Self {
		Self { docx }
	}
}

impl DocxDocument {
	/// Parse the raw bytes of a `.docx` container.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
		docx_rs::read_docx(bytes)
			.map(Self::from)
			.map_err(|e| e.to_string())
	}

	pub fn into_inner(self) -> Docx {
		self.docx
	}

	/// The text of every run group, paragraph by paragraph in traversal order.
	pub fn paragraph_texts(&self) -> Vec<String> {
		let mut texts = Vec::new();

		for paragraph in self.paragraphs() {
			collect_group_texts(&paragraph.children, &mut texts);
		}

		texts
	}

	/// Offer every run group's text to `rewrite`, in the same order as
	/// [`DocxDocument::paragraph_texts`]. Returns the number of groups that
	/// were rewritten.
	pub fn rewrite_paragraphs<F>(&mut self, mut rewrite: F) -> usize
	where
		F: FnMut(&str) -> Option<String>,
	{
		let mut rewritten = 0;

		for paragraph in self.paragraphs_mut() {
			rewritten += rewrite_groups(&mut paragraph.children, &mut rewrite);
		}

		rewritten
	}

	pub fn save(self, path: &Path) -> DocfillResult<()> {
		let write_error = |reason: String| {
			DocfillError::DocumentWrite {
				path: path.display().to_string(),
				reason,
			}
		};

		let file = std::fs::File::create(path).map_err(|e| write_error(e.to_string()))?;
		self.docx
			.build()
			.pack(file)
			.map_err(|e| write_error(e.to_string()))
	}

	/// Top-level paragraphs first, then the paragraphs of every table cell.
	fn paragraphs(&self) -> Vec<&Paragraph> {
		let mut paragraphs: Vec<&Paragraph> = Vec::new();
		let mut tables: Vec<&Table> = Vec::new();

		for child in &self.docx.document.children {
			match child {
				DocumentChild::Paragraph(paragraph) => paragraphs.push(paragraph),
				DocumentChild::Table(table) => tables.push(table),
				_ => {}
			}
		}

		for table in tables {
			paragraphs.extend(table_paragraphs(table));
		}

		paragraphs
	}

	fn paragraphs_mut(&mut self) -> Vec<&mut Paragraph> {
		let mut paragraphs: Vec<&mut Paragraph> = Vec::new();
		let mut tables: Vec<&mut Table> = Vec::new();

		for child in &mut self.docx.document.children {
			match child {
				DocumentChild::Paragraph(paragraph) => paragraphs.push(paragraph),
				DocumentChild::Table(table) => tables.push(table),
				_ => {}
			}
		}

		for table in tables {
			paragraphs.extend(table_paragraphs_mut(table));
		}

		paragraphs
	}
}

/// Paragraphs directly inside the cells of `table`, row by row and cell by
/// cell. Tables nested inside cells are not visited.
#[allow(irrefutable_let_patterns)]
fn table_paragraphs(table: &Table) -> Vec<&Paragraph> {
	let mut paragraphs: Vec<&Paragraph> = Vec::new();

	for row in &table.rows {
		let TableChild::TableRow(row) = row else {
			continue;
		};
		for cell in &row.cells {
			let TableRowChild::TableCell(cell) = cell else {
				continue;
			};
			for content in &cell.children {
				if let TableCellContent::Paragraph(paragraph) = content {
					paragraphs.push(paragraph);
				}
			}
		}
	}

	paragraphs
}

#[allow(irrefutable_let_patterns)]
fn table_paragraphs_mut(table: &mut Table) -> Vec<&mut Paragraph> {
	let mut paragraphs: Vec<&mut Paragraph> = Vec::new();

	for row in &mut table.rows {
		let TableChild::TableRow(row) = row else {
			continue;
		};
		for cell in &mut row.cells {
			let TableRowChild::TableCell(cell) = cell else {
				continue;
			};
			for content in &mut cell.children {
				if let TableCellContent::Paragraph(paragraph) = content {
					paragraphs.push(paragraph);
				}
			}
		}
	}

	paragraphs
}

fn collect_group_texts(children: &[ParagraphChild], texts: &mut Vec<String>) {
	let mut group: Option<String> = None;

	for child in children {
		match child {
			ParagraphChild::Run(run) => push_run_text(group.get_or_insert_with(String::new), run),
			ParagraphChild::Hyperlink(hyperlink) => {
				texts.extend(group.take());
				collect_group_texts(&hyperlink.children, texts);
			}
			_ => texts.extend(group.take()),
		}
	}

	texts.extend(group);
}

fn push_run_text(text: &mut String, run: &Run) {
	for child in &run.children {
		match child {
			RunChild::Text(t) => text.push_str(&t.text),
			RunChild::Tab(_) => text.push('\t'),
			RunChild::Break(_) => text.push('\n'),
			_ => {}
		}
	}
}

/// Rewrite each run group of `children` in place, recursing into hyperlinks.
fn rewrite_groups<F>(children: &mut Vec<ParagraphChild>, rewrite: &mut F) -> usize
where
	F: FnMut(&str) -> Option<String>,
{
	let mut rewritten = 0;
	let mut group: Vec<ParagraphChild> = Vec::new();
	let mut result: Vec<ParagraphChild> = Vec::with_capacity(children.len());

	for child in std::mem::take(children) {
		match child {
			ParagraphChild::Run(_) => group.push(child),
			mut other => {
				rewritten += flush_group(&mut group, &mut result, rewrite);
				if let ParagraphChild::Hyperlink(hyperlink) = &mut other {
					rewritten += rewrite_groups(&mut hyperlink.children, rewrite);
				}
				result.push(other);
			}
		}
	}

	rewritten += flush_group(&mut group, &mut result, rewrite);
	*children = result;

	rewritten
}

/// Move `group` into `result`, replaced by a single run when `rewrite`
/// changes its text.
fn flush_group<F>(
	group: &mut Vec<ParagraphChild>,
	result: &mut Vec<ParagraphChild>,
	rewrite: &mut F,
) -> usize
where
	F: FnMut(&str) -> Option<String>,
{
	if group.is_empty() {
		return 0;
	}

	let mut text = String::new();
	let mut run_property: Option<RunProperty> = None;

	for child in group.iter() {
		if let ParagraphChild::Run(run) = child {
			if run_property.is_none() {
				run_property = Some(run.run_property.clone());
			}
			push_run_text(&mut text, run);
		}
	}

	match rewrite(&text) {
		Some(new_text) => {
			group.clear();
			result.push(ParagraphChild::Run(Box::new(build_run(&new_text, run_property))));
			1
		}
		None => {
			result.append(group);
			0
		}
	}
}

fn build_run(text: &str, run_property: Option<RunProperty>) -> Run {
	let mut run = Run::new();
	if let Some(run_property) = run_property {
		run.run_property = run_property;
	}

	for (line_index, line) in text.split('\n').enumerate() {
		if line_index > 0 {
			run = run.add_break(BreakType::TextWrapping);
		}
		for (segment_index, segment) in line.split('\t').enumerate() {
			if segment_index > 0 {
				run = run.add_tab();
			}
			if !segment.is_empty() {
				run = run.add_text(segment);
			}
		}
	}

	run
}
