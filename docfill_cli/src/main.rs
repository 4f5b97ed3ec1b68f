use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use docfill_cli::Commands;
use docfill_cli::DataArgs;
use docfill_cli::DocfillCli;
use docfill_cli::OutputFormat;
use docfill_core::BatchOptions;
use docfill_core::DEFAULT_MAX_FILE_SIZE;
use docfill_core::DocfillConfig;
use docfill_core::DocfillError;
use docfill_core::Document;
use docfill_core::SubstitutionMap;
use docfill_core::fill_document;
use docfill_core::fill_with_limit;
use docfill_core::generate_batch;
use docfill_core::load_data_file;
use docfill_core::missing_tags_with_limit;
use docfill_core::scan_with_limit;
use docfill_core::try_scan_with_limit;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
	let args = DocfillCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Scan {
			template,
			format,
			strict,
		}) => run_scan(&args, template, *format, *strict),
		Some(Commands::Fill {
			template,
			output,
			data,
			dry_run,
		}) => run_fill(&args, template, output, data, *dry_run),
		Some(Commands::Check {
			template,
			data,
			format,
		}) => run_check(&args, template, data, *format),
		Some(Commands::Batch {
			templates,
			output,
			data,
		}) => run_batch(&args, templates.as_deref(), output.as_deref(), data),
		None => {
			eprintln!("No subcommand specified. Run `docfill --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<DocfillError>() {
			Ok(docfill_err) => {
				let report: miette::Report = (*docfill_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr so they never mix with command output. `RUST_LOG`
/// overrides the default level.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose {
		"docfill=debug,docfill_core=debug"
	} else {
		"warn"
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_ansi(use_color)
		.with_writer(std::io::stderr)
		.init();
}

fn resolve_root(args: &DocfillCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(args: &DocfillCli) -> CliResult<(PathBuf, Option<DocfillConfig>)> {
	let root = resolve_root(args);
	let config = DocfillConfig::load(&root)?;
	Ok((root, config))
}

fn max_file_size(config: Option<&DocfillConfig>) -> u64 {
	config.map_or(DEFAULT_MAX_FILE_SIZE, |config| config.max_file_size)
}

/// Build the substitution map: config data and values, then `--data` files in
/// order, then `--set` pairs.
fn load_values(
	root: &Path,
	config: Option<&DocfillConfig>,
	data: &DataArgs,
) -> CliResult<SubstitutionMap> {
	let mut values = match config {
		Some(config) => config.load_data(root)?,
		None => SubstitutionMap::new(),
	};

	for path in &data.data_files {
		values.merge(load_data_file(path)?);
	}

	for (key, value) in &data.values {
		values.insert(key.clone(), value.clone());
	}

	tracing::debug!(entries = values.len(), "loaded tag values");
	Ok(values)
}

fn run_init(args: &DocfillCli) -> CliResult<()> {
	let root = resolve_root(args);
	let config_path = root.join("docfill.toml");

	if config_path.exists() {
		println!("Config file already exists: {}", config_path.display());
		return Ok(());
	}

	let sample_config = "# docfill configuration\n\n# Templates used by `docfill batch`.\n[templates]\ndir \
	                     = \"templates\"\npatterns = [\"*.docx\"]\nexclude = [\"~$*\"]\n\n# Where \
	                     `docfill batch` writes generated documents.\n[output]\ndir = \
	                     \"generated\"\n\n# Map data files to tag namespaces.\n# Values from these \
	                     files are available as ((namespace.key)).\n# [data]\n# processo = \
	                     \"processo.json\"\n\n# Literal tag values.\n# [values]\n# Orgao = \
	                     \"Prefeitura Municipal\"\n";

	std::fs::write(&config_path, sample_config)?;
	println!("Created docfill.toml");
	println!();
	println!("Next steps:");
	println!("  1. Put your .docx templates in {}", root.join("templates").display());
	println!("  2. Add tags to the templates, for example: Objeto: ((Objeto))");
	println!("  3. Run `docfill batch --set Objeto=...` to generate the documents");

	Ok(())
}

fn run_scan(args: &DocfillCli, template: &Path, format: OutputFormat, strict: bool) -> CliResult<()> {
	let config = match load_config(args) {
		Ok((_, config)) => config,
		Err(e) if !strict => {
			tracing::warn!(error = %e, "ignoring unreadable config");
			None
		}
		Err(e) => return Err(e),
	};
	let limit = max_file_size(config.as_ref());

	let tags = if strict {
		try_scan_with_limit(template, limit)?
	} else {
		scan_with_limit(template, limit)
	};

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::json!(tags));
		}
		OutputFormat::Text => {
			for tag in &tags {
				println!("{tag}");
			}
		}
	}

	Ok(())
}

fn run_fill(
	args: &DocfillCli,
	template: &Path,
	output: &Path,
	data: &DataArgs,
	dry_run: bool,
) -> CliResult<()> {
	let (root, config) = load_config(args)?;
	let values = load_values(&root, config.as_ref(), data)?;
	let limit = max_file_size(config.as_ref());

	if dry_run {
		return run_fill_dry_run(template, output, &values, limit);
	}

	let report = fill_with_limit(template, &values, output, limit)?;
	println!(
		"{} {} ({} substitution(s))",
		colored!("Generated", green),
		output.display(),
		report.substitutions
	);
	print_unresolved(&report.unresolved);

	Ok(())
}

fn run_fill_dry_run(
	template: &Path,
	output: &Path,
	values: &SubstitutionMap,
	limit: u64,
) -> CliResult<()> {
	let mut document = Document::load_with_limit(template, limit).map_err(DocfillError::generation)?;
	let before = document.paragraph_texts();
	let report = fill_document(&mut document, values);
	let after = document.paragraph_texts();

	println!(
		"{} {} paragraph(s) would change in {}",
		colored!("Dry run:", bold),
		report.paragraphs_rewritten,
		output.display()
	);

	for (current, filled) in before.iter().zip(&after) {
		if current != filled {
			println!();
			print_diff(current, filled);
		}
	}

	print_unresolved(&report.unresolved);
	Ok(())
}

fn run_check(
	args: &DocfillCli,
	template: &Path,
	data: &DataArgs,
	format: OutputFormat,
) -> CliResult<()> {
	let (root, config) = load_config(args)?;
	let values = load_values(&root, config.as_ref(), data)?;
	let missing = missing_tags_with_limit(template, &values, max_file_size(config.as_ref()))?;

	match format {
		OutputFormat::Json => {
			let output = serde_json::json!({
				"ok": missing.is_empty(),
				"template": template.display().to_string(),
				"missing": missing,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			if missing.is_empty() {
				println!(
					"Check passed: every tag of {} has a value.",
					template.display()
				);
			} else {
				let report: miette::Report = DocfillError::MissingTags {
					template: template.display().to_string(),
					tags: missing.clone(),
				}
				.into();
				eprintln!("{report:?}");
			}
		}
	}

	if !missing.is_empty() {
		process::exit(1);
	}

	Ok(())
}

fn run_batch(
	args: &DocfillCli,
	templates: Option<&Path>,
	output: Option<&Path>,
	data: &DataArgs,
) -> CliResult<()> {
	let (root, config) = load_config(args)?;
	let values = load_values(&root, config.as_ref(), data)?;

	let mut options = BatchOptions::from_config(&root, config.as_ref())?;
	if let Some(templates) = templates {
		options.templates_dir = templates.to_path_buf();
	}
	if let Some(output) = output {
		options.output_dir = output.to_path_buf();
	}

	let report = generate_batch(&options, &values)?;
	for document in &report.generated {
		println!(
			"{} {}",
			colored!("Generated", green),
			document.output.display()
		);
	}
	println!(
		"{}",
		colored!(format!("{} document(s) generated.", report.len()), bold)
	);
	print_unresolved(&report.unresolved_tags());

	Ok(())
}

fn print_unresolved(tags: &[String]) {
	if tags.is_empty() {
		return;
	}

	eprintln!(
		"{} tag(s) left without a value: {}",
		colored!("warning:", yellow),
		tags.join(", ")
	);
}

/// Print a line diff between a paragraph and its filled text, colorized.
fn print_diff(current: &str, filled: &str) {
	let diff = TextDiff::from_lines(current, filled);
	for change in diff.iter_all_changes() {
		let line = change.value().trim_end_matches('\n');
		match change.tag() {
			ChangeTag::Delete => {
				println!("  {}", colored!(format!("-{line}"), red));
			}
			ChangeTag::Insert => {
				println!("  {}", colored!(format!("+{line}"), green));
			}
			ChangeTag::Equal => {
				println!("   {line}");
			}
		}
	}
}
