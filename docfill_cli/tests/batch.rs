mod common;

use docfill_core::AnyEmptyResult;
use docfill_core::Document;

#[test]
fn batch_uses_default_directories() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let templates = tmp.path().join("templates");
	common::write_docx(&templates.join("dfd.docx"), &["DFD ((DFD))"])?;
	common::write_docx(&templates.join("termo.docx"), &["Termo ((DFD)) ((Pendente))"])?;
	std::fs::write(templates.join("~$dfd.docx"), "lock file")?;

	common::docfill_cmd()
		.arg("batch")
		.arg("--path")
		.arg(tmp.path())
		.arg("--set")
		.arg("DFD=038/2025")
		.assert()
		.success()
		.stdout(predicates::str::contains("2 document(s) generated."))
		.stderr(predicates::str::contains("without a value: Pendente"));

	let generated = tmp.path().join("generated");
	assert_eq!(
		Document::load(&generated.join("dfd.docx"))?.paragraph_texts(),
		vec!["DFD 038/2025"]
	);
	assert!(generated.join("termo.docx").is_file());
	assert!(!generated.join("~$dfd.docx").exists());

	Ok(())
}

#[test]
fn batch_uses_config_directories_and_patterns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let templates = tmp.path().join("modelos");
	std::fs::create_dir_all(&templates)?;
	std::fs::write(templates.join("a.txt"), "Objeto: ((Objeto))\n")?;
	std::fs::write(templates.join("rascunho.txt"), "((Objeto))\n")?;
	std::fs::write(
		tmp.path().join("docfill.toml"),
		"[templates]\ndir = \"modelos\"\npatterns = [\"*.txt\"]\nexclude = [\"rascunho*\"]\n\n[output]\ndir = \"saida\"\n\n[values]\nObjeto = \"Serviços\"\n",
	)?;

	common::docfill_cmd()
		.arg("batch")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("1 document(s) generated."));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("saida/a.txt"))?,
		"Objeto: Serviços\n"
	);
	assert!(!tmp.path().join("saida/rascunho.txt").exists());

	Ok(())
}

#[test]
fn batch_explicit_directories_override_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let templates = tmp.path().join("outros");
	let output = tmp.path().join("destino");
	common::write_docx(&templates.join("dfd.docx"), &["((DFD))"])?;

	common::docfill_cmd()
		.arg("batch")
		.arg("--path")
		.arg(tmp.path())
		.arg("--templates")
		.arg(&templates)
		.arg("--output")
		.arg(&output)
		.arg("--set")
		.arg("DFD=1")
		.assert()
		.success();

	assert!(output.join("dfd.docx").is_file());
	assert!(!tmp.path().join("generated").exists());

	Ok(())
}

#[test]
fn batch_without_templates_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("templates"))?;

	common::docfill_cmd()
		.arg("batch")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no templates found"));

	Ok(())
}
