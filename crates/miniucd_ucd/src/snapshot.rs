use std::path::Path;
use miniucd_logging::{log_info, LogCategory};
use serde::{Deserialize, Serialize};
use crate::{read_file, write_file_atomic, PropertyValues, UcdError, UcdResult};

const LOG_CAT : LogCategory = LogCategory::new("Flatten");

/// Flattened UCD data, persisted between the parse and generate stages
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UcdData {
	pub version         : String,
	/// Highest codepoint of the source repertoire
	pub last_cp         : u32,
	pub property_values : PropertyValues,
}

impl UcdData {
	/// Write the data as JSON, replacing `path` only once everything is written
	pub fn save(&self, path: &Path) -> UcdResult<()> {
		let json = serde_json::to_vec_pretty(self)?;
		write_file_atomic(path, &json)?;
		log_info!(LOG_CAT, "Saved {} properties to {}", self.property_values.len(), path.display());
		Ok(())
	}

	/// Load data written by [`UcdData::save`], which must have been generated for `version`
	pub fn load(path: &Path, version: &str) -> UcdResult<Self> {
		let json = read_file(path)?;
		let data: UcdData = serde_json::from_str(&json)?;
		check_version(&path.display().to_string(), version, Some(&data.version))?;
		Ok(data)
	}
}

/// Check the version declared by an input, a missing version is a mismatch too
pub fn check_version(artifact: &str, expected: &str, found: Option<&str>) -> UcdResult<()> {
	match found {
		Some(found) if found == expected => Ok(()),
		found => Err(UcdError::VersionMismatch {
			artifact: artifact.to_string(),
			expected: expected.to_string(),
			found: found.unwrap_or("no version").to_string(),
		}),
	}
}
