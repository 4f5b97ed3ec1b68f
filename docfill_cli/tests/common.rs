#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use docfill_core::AnyResult;
use docx_rs::Docx;
use docx_rs::Paragraph;
use docx_rs::Run;
use insta_cmd::get_cargo_bin;

pub fn docfill_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("docfill"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// Write a `.docx` with one paragraph per entry of `paragraphs`.
pub fn write_docx(path: &Path, paragraphs: &[&str]) -> AnyResult<PathBuf> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}

	let mut docx = Docx::new();
	for text in paragraphs {
		docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
	}

	let file = std::fs::File::create(path)?;
	docx.build().pack(file)?;
	Ok(path.to_path_buf())
}
