use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DocfillError;
use crate::DocfillResult;
use crate::SubstitutionMap;
use crate::data::format_from_path;
use crate::data::parse_data_file;
use crate::substitution::stringify_value;

/// Default maximum template size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["docfill.toml", ".docfill.toml", ".config/docfill.toml"];

/// Template directory used when no config overrides it.
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Output directory used when no config overrides it.
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// Data source entry for a `[data]` namespace.
///
/// ```toml
/// [data]
/// processo = "processo.json"
/// extra = { path = "extra-values", format = "yaml" }
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum DataSource {
	Path(PathBuf),
	Typed(TypedDataSource),
}

impl DataSource {
	pub fn path(&self) -> &Path {
		match self {
			Self::Path(path) => path.as_path(),
			Self::Typed(typed) => typed.path.as_path(),
		}
	}

	/// The explicit format, or the one implied by the file extension.
	pub fn format(&self) -> String {
		match self {
			Self::Path(path) => format_from_path(path),
			Self::Typed(typed) => typed.format.trim().to_ascii_lowercase(),
		}
	}
}

/// Typed data source configuration for `[data]` entries.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct TypedDataSource {
	pub path: PathBuf,
	pub format: String,
}

/// Configuration loaded from a `docfill.toml` file.
///
/// ```toml
/// max_file_size = 10485760
///
/// [templates]
/// dir = "templates_padrao"
/// patterns = ["*.docx"]
/// exclude = ["~$*"]
///
/// [output]
/// dir = "generated"
///
/// [data]
/// processo = "processo.json"
///
/// [values]
/// Orgao = "Prefeitura Municipal"
/// ```
#[derive(Debug, Deserialize)]
pub struct DocfillConfig {
	/// Where batch generation looks for templates.
	#[serde(default)]
	pub templates: TemplatesConfig,
	/// Where batch generation writes generated documents.
	#[serde(default)]
	pub output: OutputConfig,
	/// Map of namespace to data file. Entries of each file are available as
	/// `((namespace.key))`.
	#[serde(default)]
	pub data: BTreeMap<String, DataSource>,
	/// Literal tag values. These win over values loaded from `[data]`.
	#[serde(default)]
	pub values: BTreeMap<String, serde_json::Value>,
	/// Templates larger than this are rejected before parsing. Defaults to
	/// 10 MB.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
}

impl Default for DocfillConfig {
	fn default() -> Self {
		Self {
			templates: TemplatesConfig::default(),
			output: OutputConfig::default(),
			data: BTreeMap::new(),
			values: BTreeMap::new(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
		}
	}
}

/// Which files of the template directory are templates.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
	/// Directory holding the templates, relative to the project root.
	#[serde(default = "default_templates_dir")]
	pub dir: PathBuf,
	/// Glob patterns a file name must match to be treated as a template.
	#[serde(default = "default_template_patterns")]
	pub patterns: Vec<String>,
	/// Glob patterns for file names to skip. Defaults to Word lock files
	/// (`~$*`).
	#[serde(default = "default_template_exclude")]
	pub exclude: Vec<String>,
}

impl Default for TemplatesConfig {
	fn default() -> Self {
		Self {
			dir: default_templates_dir(),
			patterns: default_template_patterns(),
			exclude: default_template_exclude(),
		}
	}
}

/// Where generated documents go.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
	/// Output directory, relative to the project root.
	#[serde(default = "default_output_dir")]
	pub dir: PathBuf,
}

impl Default for OutputConfig {
	fn default() -> Self {
		Self {
			dir: default_output_dir(),
		}
	}
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

fn default_templates_dir() -> PathBuf {
	PathBuf::from(DEFAULT_TEMPLATES_DIR)
}

fn default_output_dir() -> PathBuf {
	PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_template_patterns() -> Vec<String> {
	vec!["*.docx".to_string()]
}

fn default_template_exclude() -> Vec<String> {
	vec!["~$*".to_string()]
}

impl DocfillConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is no config file.
	pub fn load(root: &Path) -> DocfillResult<Option<DocfillConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: DocfillConfig =
			toml::from_str(&content).map_err(|e| DocfillError::ConfigParse(e.to_string()))?;

		tracing::debug!(path = %config_path.display(), "loaded config");
		Ok(Some(config))
	}

	/// Read every `[data]` file, flatten it under its namespace, then apply
	/// `[values]` on top.
	pub fn load_data(&self, root: &Path) -> DocfillResult<SubstitutionMap> {
		let mut map = SubstitutionMap::new();

		for (namespace, source) in &self.data {
			let rel_path = source.path();
			let path_display = rel_path.display().to_string();
			let content = std::fs::read_to_string(root.join(rel_path)).map_err(|e| {
				DocfillError::DataFile {
					path: path_display.clone(),
					reason: e.to_string(),
				}
			})?;

			let value = parse_data_file(&content, &source.format(), &path_display)?;
			map.extend_from_value(Some(namespace.as_str()), &value, &path_display)?;
		}

		for (key, value) in &self.values {
			map.insert(key.clone(), stringify_value(value));
		}

		Ok(map)
	}
}
