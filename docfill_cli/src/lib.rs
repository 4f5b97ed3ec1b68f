use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Fill ((Tag)) placeholders in document templates.",
	long_about = "docfill lists and fills the ((Tag)) placeholders of .docx and plain text \
	              templates.\n\nValues come from docfill.toml, data files and `--set KEY=VALUE` \
	              pairs. Tags without a value are left in the generated document as \
	              written.\n\nQuick start:\n  docfill init   Create a docfill.toml\n  docfill scan   \
	              List the tags of a template\n  docfill fill   Generate a document from a \
	              template\n  docfill check  Verify every tag has a value\n  docfill batch  \
	              Generate every template of a directory"
)]
pub struct DocfillCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory, where `docfill.toml` is looked up.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

/// Where the values for a fill come from. Later sources win: config values,
/// then `--data` files in order, then `--set` pairs.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DataArgs {
	/// Data file with tag values (json, toml, yaml or ini). May be repeated.
	#[arg(long = "data", short = 'd', value_name = "FILE")]
	pub data_files: Vec<PathBuf>,

	/// A single tag value. May be repeated.
	#[arg(long = "set", short = 's', value_name = "KEY=VALUE", value_parser = docfill_core::parse_assignment)]
	pub values: Vec<(String, String)>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `docfill.toml` in the project root.
	///
	/// If the file already exists, this command is a no-op and exits
	/// successfully.
	Init,
	/// List the tags used by a template.
	///
	/// Unreadable templates produce an empty list unless `--strict` is given.
	Scan {
		/// The template to scan.
		template: PathBuf,

		/// Output format. Use `text` for one tag per line or `json` for an
		/// array of tag names.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,

		/// Report read errors instead of printing an empty list.
		#[arg(long, default_value_t = false)]
		strict: bool,
	},
	/// Generate a document by filling the tags of a template.
	Fill {
		/// The template to fill.
		template: PathBuf,

		/// Where to write the generated document.
		output: PathBuf,

		#[command(flatten)]
		data: DataArgs,

		/// Show the paragraphs that would change without writing anything.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Check that every tag of a template has a value.
	///
	/// Exits with a non-zero status code when tags are missing.
	Check {
		/// The template to check.
		template: PathBuf,

		#[command(flatten)]
		data: DataArgs,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Fill every template of a directory with the same values.
	///
	/// Defaults to the `[templates]` and `[output]` directories of
	/// `docfill.toml`. Word lock files (`~$*`) are skipped.
	Batch {
		/// Directory holding the templates.
		#[arg(long)]
		templates: Option<PathBuf>,

		/// Directory to write generated documents to.
		#[arg(long)]
		output: Option<PathBuf>,

		#[command(flatten)]
		data: DataArgs,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
