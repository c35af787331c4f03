//! Property and property value aliases, read from `PropertyAliases.txt` and `PropertyValueAliases.txt`.

use std::collections::HashMap;
use miniucd_logging::{log_verbose, log_warning, LogCategory};
use miniucd_parser_utils::str_parser::StrParser;
use crate::{find_property, PropertyDescriptor, PropertyType, PROPERTIES};

const LOG_CAT : LogCategory = LogCategory::new("Aliases");

/// One `;` separated record of an alias file
struct AliasRecord<'a> {
	fields     : Vec<&'a str>,
	/// Text after the `#` on the record's line
	annotation : Option<&'a str>,
}

/// Iterate over the records of an alias file, skipping blank and comment lines
fn parse_records(source: &str) -> impl Iterator<Item = AliasRecord<'_>> {
	let mut parser = StrParser::new(source);
	core::iter::from_fn(move || {
		while parser.can_parse() {
			let mut line = StrParser::new(parser.extract_line());
			let content = line.extract_until(|ch| ch == '#').trim();
			if content.is_empty() {
				continue;
			}

			let annotation = if line.consume_char('#') { Some(line.string.trim()) } else { None };
			let fields = content.split(';').map(str::trim).collect();
			return Some(AliasRecord { fields, annotation });
		}
		None
	})
}

/// Collect the non-empty spellings, dropping repeated ones
fn dedup_fields<'a>(fields: impl Iterator<Item = &'a str>) -> Vec<String> {
	let mut group: Vec<String> = Vec::new();
	for field in fields {
		if !field.is_empty() && !group.iter().any(|alias| alias == field) {
			group.push(field.to_string());
		}
	}
	group
}

/// Read the version from a header line like `# PropertyAliases-16.0.0.txt`
fn parse_header_version(source: &str, file_stem: &str) -> Option<String> {
	source.lines()
		.take_while(|line| line.starts_with('#'))
		.find_map(|line| {
			let name = line.trim_start_matches('#').trim();
			let version = name.strip_prefix(file_stem)?.strip_prefix('-')?.strip_suffix(".txt")?;
			Some(version.to_string())
		})
}

/// Property name aliases: every spelling maps to the alias group it is part of
#[derive(Clone, Default, Debug)]
pub struct PropertyAliases {
	groups  : Vec<Vec<String>>,
	lookup  : HashMap<String, usize>,
	version : Option<String>,
}

impl PropertyAliases {
	pub const FILE_NAME: &'static str = "PropertyAliases.txt";

	/// Parse the contents of `PropertyAliases.txt`
	pub fn parse(source: &str) -> Self {
		let mut aliases = Self {
			version: parse_header_version(source, "PropertyAliases"),
			..Self::default()
		};

		for record in parse_records(source) {
			let group = dedup_fields(record.fields.iter().copied());
			if group.is_empty() {
				continue;
			}

			let idx = aliases.groups.len();
			for alias in &group {
				if aliases.lookup.insert(alias.clone(), idx).is_some() {
					log_warning!(LOG_CAT, "Property alias '{alias}' is defined more than once, using the last definition");
				}
			}
			aliases.groups.push(group);
		}

		log_verbose!(LOG_CAT, "Loaded {} property alias groups", aliases.groups.len());
		aliases
	}

	/// Get the alias group a spelling belongs to
	pub fn get(&self, spelling: &str) -> Option<&[String]> {
		self.lookup.get(spelling).map(|idx| self.groups[*idx].as_slice())
	}

	/// Alias groups in file order
	pub fn groups(&self) -> &[Vec<String>] {
		&self.groups
	}

	/// Version declared in the file header
	pub fn version(&self) -> Option<&str> {
		self.version.as_deref()
	}
}

/// Value alias groups of a single enumerated property
#[derive(Clone, Default, Debug)]
pub struct ValueGroups {
	groups : Vec<Vec<String>>,
	lookup : HashMap<String, usize>,
}

impl ValueGroups {
	fn push(&mut self, group: Vec<String>) {
		let idx = self.groups.len();
		for alias in &group {
			self.lookup.entry(alias.clone()).or_insert(idx);
		}
		self.groups.push(group);
	}

	/// Alias groups in file order
	pub fn groups(&self) -> &[Vec<String>] {
		&self.groups
	}

	/// Get the first spelling of the group `spelling` belongs to
	pub fn canonical(&self, spelling: &str) -> Option<&str> {
		self.lookup.get(spelling).map(|idx| self.groups[*idx][0].as_str())
	}

	pub fn len(&self) -> usize {
		self.groups.len()
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}
}

/// Value aliases of the enumerated properties
#[derive(Clone, Default, Debug)]
pub struct ValueAliases {
	properties : HashMap<&'static str, ValueGroups>,
	version    : Option<String>,
}

impl ValueAliases {
	pub const FILE_NAME: &'static str = "PropertyValueAliases.txt";

	/// Parse the contents of `PropertyValueAliases.txt`
	///
	/// Records of unknown or non-enumerated properties are skipped, as are the general category records that define a combination of other categories.
	pub fn parse(source: &str) -> Self {
		let mut aliases = Self {
			version: parse_header_version(source, "PropertyValueAliases"),
			..Self::default()
		};

		for record in parse_records(source) {
			let Some((property, values)) = record.fields.split_first() else { continue };
			let Some(desc) = find_property(property) else { continue };
			if desc.ty != PropertyType::Enum {
				continue;
			}
			// e.g. `gc ; L ; Letter # Ll | Lm | Lo | Lt | Lu`
			if desc.name == "gc" && record.annotation.is_some() {
				continue;
			}

			let group = dedup_fields(values.iter().copied());
			if group.is_empty() {
				continue;
			}
			aliases.properties.entry(desc.name).or_default().push(group);
		}

		log_verbose!(LOG_CAT, "Loaded value aliases for {} enumerated properties", aliases.properties.len());
		aliases
	}

	/// Get the value alias groups of an enumerated property
	pub fn get(&self, property: &str) -> Option<&ValueGroups> {
		self.properties.get(property)
	}

	/// Version declared in the file header
	pub fn version(&self) -> Option<&str> {
		self.version.as_deref()
	}
}

/// Static property descriptors combined with the loaded aliases
#[derive(Clone, Debug)]
pub struct PropertyCatalog {
	names   : PropertyAliases,
	values  : ValueAliases,
	by_name : HashMap<String, &'static PropertyDescriptor>,
}

impl Default for PropertyCatalog {
	fn default() -> Self {
		Self::new(PropertyAliases::default(), ValueAliases::default())
	}
}

impl PropertyCatalog {
	pub fn new(names: PropertyAliases, values: ValueAliases) -> Self {
		let mut by_name = HashMap::new();
		for desc in PROPERTIES {
			if let Some(group) = names.get(desc.name) {
				for alias in group {
					by_name.entry(alias.clone()).or_insert(desc);
				}
			}
		}
		// Short names always win over aliases
		for desc in PROPERTIES {
			by_name.insert(desc.name.to_string(), desc);
		}

		Self { names, values, by_name }
	}

	/// Find a property by any of its spellings, e.g. `Script` or `sc`
	pub fn property(&self, spelling: &str) -> Option<&'static PropertyDescriptor> {
		self.by_name.get(spelling).copied()
	}

	/// Resolve a value spelling of a property to the spelling used in the data, e.g. `Latin` to `Latn` for `sc`
	///
	/// enumList properties use the values of the property they refer to.
	pub fn canonical_value<'a>(&'a self, property: &str, spelling: &'a str) -> Option<&'a str> {
		let desc = self.property(property)?;
		let value_property = desc.enum_ref.unwrap_or(desc.name);
		self.values.get(value_property)?.canonical(spelling)
	}

	pub fn names(&self) -> &PropertyAliases {
		&self.names
	}

	pub fn values(&self) -> &ValueAliases {
		&self.values
	}
}
