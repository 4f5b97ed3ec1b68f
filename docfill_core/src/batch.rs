use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;

use crate::DocfillConfig;
use crate::DocfillError;
use crate::DocfillResult;
use crate::FillReport;
use crate::SubstitutionMap;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::config::DEFAULT_OUTPUT_DIR;
use crate::config::DEFAULT_TEMPLATES_DIR;
use crate::filler::fill_with_limit;
use crate::filler::is_same_path;

/// Where batch generation reads templates from and writes documents to.
#[derive(Debug, Clone)]
pub struct BatchOptions {
	pub templates_dir: PathBuf,
	pub output_dir: PathBuf,
	/// File names that count as templates.
	pub include: GlobSet,
	/// File names to skip even when they match `include`.
	pub exclude: GlobSet,
	pub max_file_size: u64,
}

impl BatchOptions {
	/// Options with the default patterns: `*.docx` files, skipping Word lock
	/// files (`~$*`).
	pub fn new(templates_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
		let mut include = GlobSetBuilder::new();
		let mut exclude = GlobSetBuilder::new();
		if let Ok(glob) = Glob::new("*.docx") {
			include.add(glob);
		}
		if let Ok(glob) = Glob::new("~$*") {
			exclude.add(glob);
		}

		Self {
			templates_dir: templates_dir.into(),
			output_dir: output_dir.into(),
			include: include.build().unwrap_or_else(|_| GlobSet::empty()),
			exclude: exclude.build().unwrap_or_else(|_| GlobSet::empty()),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
		}
	}

	/// Options taken from the config, with directories resolved against
	/// `root`.
	pub fn from_config(root: &Path, config: Option<&DocfillConfig>) -> DocfillResult<Self> {
		let Some(config) = config else {
			return Ok(Self::new(
				root.join(DEFAULT_TEMPLATES_DIR),
				root.join(DEFAULT_OUTPUT_DIR),
			));
		};

		let mut options = Self::new(
			root.join(&config.templates.dir),
			root.join(&config.output.dir),
		)
		.with_patterns(&config.templates.patterns, &config.templates.exclude)?;
		options.max_file_size = config.max_file_size;

		Ok(options)
	}

	/// Replace the include and exclude patterns.
	pub fn with_patterns(mut self, include: &[String], exclude: &[String]) -> DocfillResult<Self> {
		self.include = build_glob_set(include)?;
		self.exclude = build_glob_set(exclude)?;
		Ok(self)
	}

	/// Returns true if a file called `file_name` is a template.
	pub fn is_template(&self, file_name: &str) -> bool {
		self.include.is_match(file_name) && !self.exclude.is_match(file_name)
	}
}

fn build_glob_set(patterns: &[String]) -> DocfillResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			DocfillError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
		builder.add(glob);
	}

	builder.build().map_err(|e| {
		DocfillError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Templates directly inside `options.templates_dir`, sorted by file name.
/// Subdirectories are not searched.
pub fn list_templates(options: &BatchOptions) -> DocfillResult<Vec<PathBuf>> {
	let mut templates = Vec::new();

	for entry in std::fs::read_dir(&options.templates_dir)? {
		let entry = entry?;
		if !entry.file_type()?.is_file() {
			continue;
		}

		let file_name = entry.file_name();
		let Some(file_name) = file_name.to_str() else {
			continue;
		};

		if options.is_template(file_name) {
			templates.push(entry.path());
		} else {
			tracing::debug!(file = file_name, "skipping non-template file");
		}
	}

	templates.sort();
	Ok(templates)
}

/// A document produced by [`generate_batch`].
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
	pub template: PathBuf,
	pub output: PathBuf,
	pub report: FillReport,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
	pub generated: Vec<GeneratedDocument>,
}

impl BatchReport {
	pub fn len(&self) -> usize {
		self.generated.len()
	}

	pub fn is_empty(&self) -> bool {
		self.generated.is_empty()
	}

	/// Unresolved tags across all documents, deduplicated, in order of first
	/// appearance.
	pub fn unresolved_tags(&self) -> Vec<String> {
		let mut tags: Vec<String> = Vec::new();
		for document in &self.generated {
			for tag in &document.report.unresolved {
				if !tags.contains(tag) {
					tags.push(tag.clone());
				}
			}
		}
		tags
	}
}

/// Fill every template of the templates directory with the same `data`.
///
/// Each output keeps its template's file name. Documents are first written to
/// a staging directory inside the output directory and only moved into place
/// once every template has been filled. If any template fails, the staging
/// directory is removed and the error is returned, so files that were already
/// in the output directory are left untouched.
pub fn generate_batch(options: &BatchOptions, data: &SubstitutionMap) -> DocfillResult<BatchReport> {
	let templates = list_templates(options)?;
	if templates.is_empty() {
		return Err(DocfillError::NoTemplates(
			options.templates_dir.display().to_string(),
		));
	}

	let created_output_dir = !options.output_dir.exists();
	std::fs::create_dir_all(&options.output_dir)?;

	let staging_dir = options
		.output_dir
		.join(format!(".docfill-staging-{}", std::process::id()));
	std::fs::create_dir_all(&staging_dir)?;

	let result = stage_documents(options, &templates, &staging_dir, data)
		.and_then(|staged| commit_documents(staged, &options.output_dir));
	let _ = std::fs::remove_dir_all(&staging_dir);

	let generated = match result {
		Ok(generated) => generated,
		Err(e) => {
			if created_output_dir {
				let _ = std::fs::remove_dir(&options.output_dir);
			}
			return Err(e);
		}
	};

	let report = BatchReport { generated };
	tracing::info!(
		count = report.len(),
		output = %options.output_dir.display(),
		"generated batch"
	);

	Ok(report)
}

/// Fill every template into `staging_dir`.
fn stage_documents(
	options: &BatchOptions,
	templates: &[PathBuf],
	staging_dir: &Path,
	data: &SubstitutionMap,
) -> DocfillResult<Vec<GeneratedDocument>> {
	let mut staged = Vec::with_capacity(templates.len());

	for template in templates {
		let Some(file_name) = template.file_name() else {
			continue;
		};

		let target = options.output_dir.join(file_name);
		let result = if is_same_path(template, &target) {
			Err(DocfillError::generation(DocfillError::OutputIsTemplate(
				target.display().to_string(),
			)))
		} else {
			fill_with_limit(template, data, &staging_dir.join(file_name), options.max_file_size)
		};

		match result {
			Ok(report) => {
				staged.push(GeneratedDocument {
					template: template.clone(),
					output: staging_dir.join(file_name),
					report,
				});
			}
			Err(e) => {
				tracing::warn!(template = %template.display(), error = %e, "batch generation failed");
				return Err(e);
			}
		}
	}

	Ok(staged)
}

/// Move staged documents into `output_dir`, replacing files of the same name.
fn commit_documents(
	mut staged: Vec<GeneratedDocument>,
	output_dir: &Path,
) -> DocfillResult<Vec<GeneratedDocument>> {
	for document in &mut staged {
		let Some(file_name) = document.output.file_name() else {
			continue;
		};
		let target = output_dir.join(file_name);

		std::fs::rename(&document.output, &target).map_err(|e| {
			DocfillError::generation(DocfillError::DocumentWrite {
				path: target.display().to_string(),
				reason: e.to_string(),
			})
		})?;
		document.output = target;
	}

	Ok(staged)
}
