use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors produced while reading the UCD sources or the intermediate data file.
#[derive(Debug, Error)]
pub enum UcdError {
	#[error("required file not found: {}", path.display())]
	MissingFile { path: PathBuf },

	#[error("failed to access {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("malformed XML: {0}")]
	Xml(#[from] quick_xml::Error),

	#[error("invalid hexadecimal `{text}` for property `{property}` at U+{cp:04X}")]
	InvalidHex { property: String, cp: u32, text: String },

	#[error("invalid codepoint `{text}`")]
	InvalidCodepoint { text: String },

	#[error("property `{property}` changes at U+{cp:04X}, which does not follow its previous change at U+{previous:04X}")]
	OutOfOrder { property: String, cp: u32, previous: u32 },

	#[error("{artifact} declares version {found}, expected {expected}")]
	VersionMismatch { artifact: String, expected: String, found: String },

	#[error("invalid data file: {0}")]
	Snapshot(#[from] serde_json::Error),

	#[error("invalid settings: {0}")]
	Settings(String),
}

impl UcdError {
	/// Map an io error on `path`, reporting a missing file as [`UcdError::MissingFile`]
	pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
		let path = path.into();
		if source.kind() == io::ErrorKind::NotFound {
			Self::MissingFile { path }
		} else {
			Self::Io { path, source }
		}
	}
}

pub type UcdResult<T> = Result<T, UcdError>;

/// Read a whole file into memory
pub fn read_file(path: impl Into<PathBuf>) -> UcdResult<String> {
	let path = path.into();
	std::fs::read_to_string(&path).map_err(|err| UcdError::io(path, err))
}

/// Write `contents` to `path` through a sibling temporary file, so a failed run leaves the previous file untouched
pub fn write_file_atomic(path: impl Into<PathBuf>, contents: &[u8]) -> UcdResult<()> {
	let path = path.into();
	let mut tmp_name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
	tmp_name.push(".tmp");
	let tmp_path = path.with_file_name(tmp_name);

	std::fs::write(&tmp_path, contents).map_err(|err| UcdError::Io { path: tmp_path.clone(), source: err })?;
	std::fs::rename(&tmp_path, &path).map_err(|err| {
		_ = std::fs::remove_file(&tmp_path);
		UcdError::Io { path, source: err }
	})
}
