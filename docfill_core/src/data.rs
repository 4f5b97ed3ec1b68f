use std::path::Path;

use crate::DocfillError;
use crate::DocfillResult;
use crate::SubstitutionMap;

/// Detect a data format from a file extension, defaulting to `text`.
pub fn format_from_path(path: &Path) -> String {
	path.extension()
		.and_then(|e| e.to_str())
		.map_or_else(|| "text".to_string(), str::to_ascii_lowercase)
}

/// Read a data file and flatten it into a substitution map. The top level of
/// the file must be a table/object; its keys become tag names.
pub fn load_data_file(path: &Path) -> DocfillResult<SubstitutionMap> {
	let path_display = path.display().to_string();
	let content = std::fs::read_to_string(path).map_err(|e| {
		DocfillError::DataFile {
			path: path_display.clone(),
			reason: e.to_string(),
		}
	})?;

	let value = parse_data_file(&content, &format_from_path(path), &path_display)?;
	let mut map = SubstitutionMap::new();
	map.extend_from_value(None, &value, &path_display)?;

	tracing::debug!(path = %path_display, entries = map.len(), "loaded data file");
	Ok(map)
}

/// Parse a data file's content into a `serde_json::Value` based on its
/// format.
pub(crate) fn parse_data_file(
	content: &str,
	format: &str,
	path_display: &str,
) -> DocfillResult<serde_json::Value> {
	let data_error = |reason: String| {
		DocfillError::DataFile {
			path: path_display.to_string(),
			reason,
		}
	};

	match format {
		"text" | "string" | "raw" | "txt" => Ok(serde_json::Value::String(content.to_string())),
		"json" => serde_json::from_str(content).map_err(|e| data_error(e.to_string())),
		"toml" => {
			let toml_value: toml::Value =
				toml::from_str(content).map_err(|e| data_error(e.to_string()))?;
			Ok(toml_to_json(toml_value))
		}
		"yaml" | "yml" => serde_yaml_ng::from_str(content).map_err(|e| data_error(e.to_string())),
		"ini" => serde_ini::from_str(content).map_err(|e| data_error(e.to_string())),
		other => Err(DocfillError::UnsupportedDataFormat(other.to_string())),
	}
}

/// Convert a `toml::Value` to a `serde_json::Value`. Integers stay integers so
/// `numero = 38` fills as `38`, not `38.0`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
	match value {
		toml::Value::String(s) => serde_json::Value::String(s),
		toml::Value::Integer(i) => serde_json::Value::from(i),
		toml::Value::Float(f) => {
			serde_json::Number::from_f64(f)
				.map_or_else(|| serde_json::Value::String(f.to_string()), serde_json::Value::Number)
		}
		toml::Value::Boolean(b) => serde_json::Value::Bool(b),
		toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
		toml::Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect()),
		toml::Value::Table(table) => {
			serde_json::Value::Object(
				table
					.into_iter()
					.map(|(key, value)| (key, toml_to_json(value)))
					.collect(),
			)
		}
	}
}
