mod common;

use docfill_core::AnyEmptyResult;
use docfill_core::DocfillConfig;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::docfill_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created docfill.toml"));

	let content = std::fs::read_to_string(tmp.path().join("docfill.toml"))?;
	assert!(content.contains("[templates]"));
	assert!(content.contains("# [data]"));

	let config = DocfillConfig::load(tmp.path())?.ok_or("config not found")?;
	assert_eq!(config.templates.patterns, vec!["*.docx"]);
	assert_eq!(config.output.dir, std::path::PathBuf::from("generated"));

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("docfill.toml");
	std::fs::write(&config_path, "max_file_size = 1\n")?;

	common::docfill_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "max_file_size = 1\n");

	Ok(())
}

#[test]
fn no_subcommand_exits_with_usage_hint() {
	common::docfill_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("docfill --help"));
}
