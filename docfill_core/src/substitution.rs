use std::collections::BTreeMap;
use std::collections::HashMap;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Deserialize;
use serde::Serialize;

use crate::DocfillError;
use crate::DocfillResult;

/// Tag name → replacement text for a single fill.
///
/// Keys need not cover every tag of a template, and keys that no template
/// uses are allowed. Neither case is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstitutionMap(
	#[deref]
	#[deref_mut]
	BTreeMap<String, String>,
);

impl SubstitutionMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert every entry of `other`, overwriting existing keys.
	pub fn merge(&mut self, other: SubstitutionMap) {
		self.0.extend(other.0);
	}

	/// Flatten a structured data value into tag entries.
	///
	/// Object keys are joined with `.` below `namespace`, so
	/// `{"processo": {"numero": "038/2025"}}` loaded under `dados` yields the
	/// tag `dados.processo.numero`. Without a namespace the top-level value
	/// must be an object, and its keys become tag names directly.
	pub fn extend_from_value(
		&mut self,
		namespace: Option<&str>,
		value: &serde_json::Value,
		path_display: &str,
	) -> DocfillResult<()> {
		match (namespace, value) {
			(_, serde_json::Value::Object(map)) => {
				for (key, value) in map {
					let key = match namespace {
						Some(prefix) => format!("{prefix}.{key}"),
						None => key.clone(),
					};
					self.extend_from_value(Some(key.as_str()), value, path_display)?;
				}
				Ok(())
			}
			(Some(key), value) => {
				self.0.insert(key.to_string(), stringify_value(value));
				Ok(())
			}
			(None, _) => {
				Err(DocfillError::DataFile {
					path: path_display.to_string(),
					reason: "expected a table of values at the top level".to_string(),
				})
			}
		}
	}
}

impl From<BTreeMap<String, String>> for SubstitutionMap {
	fn from(map: BTreeMap<String, String>) -> Self {
		Self(map)
	}
}

impl<S: std::hash::BuildHasher> From<HashMap<String, String, S>> for SubstitutionMap {
	fn from(map: HashMap<String, String, S>) -> Self {
		map.into_iter().collect()
	}
}

impl<K, V> FromIterator<(K, V)> for SubstitutionMap
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		)
	}
}

/// Render a data value as replacement text. Strings are used verbatim,
/// `null` becomes empty, arrays are rendered as JSON.
pub fn stringify_value(value: &serde_json::Value) -> String {
	match value {
		serde_json::Value::String(s) => s.clone(),
		serde_json::Value::Null => String::new(),
		serde_json::Value::Bool(b) => b.to_string(),
		serde_json::Value::Number(n) => n.to_string(),
		serde_json::Value::Array(_) | serde_json::Value::Object(_) => value.to_string(),
	}
}

/// Parse a `KEY=VALUE` pair as given on the command line.
pub fn parse_assignment(input: &str) -> Result<(String, String), String> {
	let Some((key, value)) = input.split_once('=') else {
		return Err(format!("expected `KEY=VALUE`, got `{input}`"));
	};

	let key = key.trim();
	if key.is_empty() {
		return Err(format!("missing key in `{input}`"));
	}

	Ok((key.to_string(), value.to_string()))
}
