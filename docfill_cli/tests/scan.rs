mod common;

use clap::Parser;
use docfill_cli::Commands;
use docfill_cli::DocfillCli;
use docfill_cli::OutputFormat;
use docfill_core::AnyEmptyResult;
use serde_json::Value;

#[test]
fn scan_lists_tags_in_order() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("termo.txt");
	std::fs::write(
		&template,
		"Objeto: ((Objeto))\nValor: ((Valor)) (((ValorExtenso)))\nRepetido: (( Objeto ))\n",
	)?;

	let assert = common::docfill_cmd()
		.arg("scan")
		.arg(&template)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
	insta::assert_snapshot!(stdout, @r"
	Objeto
	Valor
	ValorExtenso
	");

	Ok(())
}

#[test]
fn scan_docx_as_json() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = common::write_docx(
		&tmp.path().join("dfd.docx"),
		&["Processo nº ((DFD))", "Secretaria: (( Secretaria ))"],
	)?;

	let output = common::docfill_cmd()
		.arg("scan")
		.arg(&template)
		.arg("--format")
		.arg("json")
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let tags: Value = serde_json::from_slice(&output)?;
	assert_eq!(tags, serde_json::json!(["DFD", "Secretaria"]));

	Ok(())
}

#[test]
fn scan_missing_template_prints_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::docfill_cmd()
		.arg("scan")
		.arg(tmp.path().join("missing.docx"))
		.arg("--format")
		.arg("json")
		.assert()
		.success()
		.stdout("[]\n");

	Ok(())
}

#[test]
fn scan_strict_reports_read_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::docfill_cmd()
		.arg("scan")
		.arg(tmp.path().join("missing.docx"))
		.arg("--strict")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to read document"));

	Ok(())
}

#[test]
fn scan_respects_configured_size_limit() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("termo.txt");
	std::fs::write(&template, "Objeto: ((Objeto))\n")?;
	std::fs::write(tmp.path().join("docfill.toml"), "max_file_size = 4\n")?;

	common::docfill_cmd()
		.arg("scan")
		.arg(&template)
		.arg("--path")
		.arg(tmp.path())
		.arg("--format")
		.arg("json")
		.assert()
		.success()
		.stdout("[]\n");

	common::docfill_cmd()
		.arg("scan")
		.arg(&template)
		.arg("--path")
		.arg(tmp.path())
		.arg("--strict")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("file too large"));

	Ok(())
}

#[test]
fn scan_format_defaults_to_text() {
	let cli = DocfillCli::parse_from(["docfill", "scan", "termo.docx"]);
	match cli.command {
		Some(Commands::Scan { format, strict, .. }) => {
			assert!(matches!(format, OutputFormat::Text));
			assert!(!strict);
		}
		_ => panic!("expected Scan command"),
	}
}
