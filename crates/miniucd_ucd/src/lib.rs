//! Unicode Character Database reading for miniucd.
//!
//! The grouped UCD XML describes properties through group defaults and per-entry overrides.
//! This crate resolves that inheritance and turns it into a list of change points per property, which is stored as the intermediate [`UcdData`].

use std::path::Path;

mod error;
mod properties;
mod value;
mod types;
mod aliases;
mod source;
mod flatten;
mod snapshot;

pub use error::*;
pub use properties::*;
pub use value::*;
pub use types::*;
pub use aliases::*;
pub use source::*;
pub use flatten::*;
pub use snapshot::*;

#[cfg(test)]
mod tests;

/// Load the property and value aliases from the UCD directory, both files must declare `version`
pub fn load_catalog(ucd_root: &Path, version: &str) -> UcdResult<PropertyCatalog> {
	let names = PropertyAliases::parse(&read_file(ucd_root.join(PropertyAliases::FILE_NAME))?);
	check_version(PropertyAliases::FILE_NAME, version, names.version())?;

	let values = ValueAliases::parse(&read_file(ucd_root.join(ValueAliases::FILE_NAME))?);
	check_version(ValueAliases::FILE_NAME, version, values.version())?;

	Ok(PropertyCatalog::new(names, values))
}

/// Read and flatten the grouped UCD XML from the UCD directory
pub fn parse_ucd(catalog: &PropertyCatalog, ucd_root: &Path, version: &str) -> UcdResult<UcdData> {
	let xml = read_file(ucd_root.join(UcdSource::FILE_NAME))?;
	let source = UcdSource::parse(&xml)?;
	check_version(UcdSource::FILE_NAME, version, source.version.as_deref())?;
	flatten(catalog, &source, version)
}
