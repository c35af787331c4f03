//! Flattening of the grouped repertoire into per-property change points.

use std::collections::{BTreeMap, HashMap};
use miniucd_logging::{log_debug, log_info, log_verbose, LogCategory};
use crate::{
	strategy, Attributes, ChangePoint, Entry, Group, PropertyCatalog, PropertyValues, UcdData, UcdError, UcdResult,
	UcdSource, Value,
};

const LOG_CAT : LogCategory = LogCategory::new("Flatten");

/// Merge the attributes of an entry with those of its group, the entry's own values take precedence
pub fn resolve<'a>(group: &'a Attributes, entry: &'a Attributes) -> BTreeMap<&'a str, &'a str> {
	let mut effective: BTreeMap<&str, &str> = group.iter().map(|(key, value)| (key.as_str(), value.as_str())).collect();
	effective.extend(entry.iter().map(|(key, value)| (key.as_str(), value.as_str())));
	effective
}

/// Walks the repertoire in codepoint order, recording a change point whenever the value of a property changes
pub struct Flattener<'c> {
	catalog     : &'c PropertyCatalog,
	/// Last value seen for each property, over the whole walk
	last_values : HashMap<&'static str, Value>,
	values      : PropertyValues,
	last_cp     : u32,
}

impl<'c> Flattener<'c> {
	pub fn new(catalog: &'c PropertyCatalog) -> Self {
		Self {
			catalog,
			last_values: HashMap::new(),
			values: PropertyValues::new(),
			last_cp: 0,
		}
	}

	/// Process all entries of a group, in order of their first codepoint
	pub fn process_group(&mut self, group: &Group) -> UcdResult<()> {
		let mut entries = group.entries.iter().collect::<Vec<_>>();
		entries.sort_by_key(|entry| entry.first);

		for entry in entries {
			self.process_entry(&group.attrs, entry)?;
		}
		Ok(())
	}

	/// Process a single entry, using `group_attrs` for the properties the entry does not set itself
	pub fn process_entry(&mut self, group_attrs: &Attributes, entry: &Entry) -> UcdResult<()> {
		self.last_cp = self.last_cp.max(entry.last);

		for (name, text) in resolve(group_attrs, &entry.attrs) {
			// Unknown attributes are not an error, the XML carries more than miniucd compiles
			let Some(desc) = self.catalog.property(name) else { continue };
			if !desc.ty.is_compiled() {
				continue;
			}

			let value = (strategy(desc.ty).normalize)(desc.name, entry.first, text)?;
			if self.last_values.get(desc.name) == Some(&value) {
				continue;
			}

			let points = self.values.entry(desc.name.to_string()).or_default();
			if let Some(previous) = points.last() {
				if previous.cp >= entry.first {
					return Err(UcdError::OutOfOrder { property: desc.name.to_string(), cp: entry.first, previous: previous.cp });
				}
			}
			points.push(ChangePoint::new(entry.first, value.clone()));
			self.last_values.insert(desc.name, value);
		}
		Ok(())
	}

	/// Highest codepoint seen so far
	pub fn last_cp(&self) -> u32 {
		self.last_cp
	}

	/// Finish the walk, returning the highest codepoint seen and the change points of every property
	pub fn finish(self) -> (u32, PropertyValues) {
		(self.last_cp, self.values)
	}
}

/// Flatten a parsed repertoire into the intermediate data
pub fn flatten(catalog: &PropertyCatalog, source: &UcdSource, version: &str) -> UcdResult<UcdData> {
	log_info!(LOG_CAT, "Flattening {} groups", source.groups.len());

	let mut flattener = Flattener::new(catalog);
	for (idx, group) in source.groups.iter().enumerate() {
		log_debug!(LOG_CAT, flatten, "Group {}/{}: {} entries", idx + 1, source.groups.len(), group.entries.len());
		flattener.process_group(group)?;
	}

	let (last_cp, property_values) = flattener.finish();
	let change_points: usize = property_values.values().map(Vec::len).sum();
	log_verbose!(LOG_CAT, "{} properties, {change_points} change points, last codepoint U+{last_cp:04X}", property_values.len());

	Ok(UcdData {
		version: version.to_string(),
		last_cp,
		property_values,
	})
}
