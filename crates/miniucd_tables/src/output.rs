use std::{collections::BTreeMap, path::Path};
use serde::Serialize;
use miniucd_logging::{log_info, log_verbose, LogCategory};
use miniucd_ucd::{write_file_atomic, PropertyCatalog, PropertyType, UcdData, UcdResult, PROPERTIES};
use crate::{classes, classes_nocase, extract_class, CharSet, ClassSpec, CompiledProperty, RangeValues};

const LOG_CAT : LogCategory = LogCategory::new("Tables");

/// Everything the emission stage needs, generated from a [`UcdData`] snapshot
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTables {
	pub version          : String,
	/// Alias groups of the property names
	pub property_aliases : Vec<Vec<String>>,
	/// Value alias groups per enumerated property
	pub value_aliases    : BTreeMap<String, Vec<Vec<String>>>,
	pub properties       : Vec<CompiledProperty>,
	pub classes          : BTreeMap<String, CharSet>,
	/// Classes to use when matching case-insensitively, only those that differ from `classes`
	pub classes_nocase   : BTreeMap<String, CharSet>,
}

impl GeneratedTables {
	pub const FILE_NAME: &'static str = "miniucd.tables.json";

	/// Write the tables to `output_dir`, replacing a previous file only once everything is written
	pub fn save(&self, output_dir: &Path) -> UcdResult<()> {
		let path = output_dir.join(Self::FILE_NAME);
		let json = serde_json::to_vec_pretty(self)?;
		write_file_atomic(&path, &json)?;
		log_info!(LOG_CAT, "Saved {} properties and {} classes to {}", self.properties.len(), self.classes.len(), path.display());
		Ok(())
	}
}

/// Compile the property tables and character classes from flattened data
pub fn generate(data: &UcdData, catalog: &PropertyCatalog) -> GeneratedTables {
	let mut properties = Vec::new();
	for desc in PROPERTIES {
		let Some(points) = data.property_values.get(desc.name) else { continue };
		let compiled = CompiledProperty::compile(desc, points, catalog);
		match &compiled.values {
			RangeValues::Indexed { unique, atoms, index_width, .. } => log_verbose!(LOG_CAT,
				"{desc}: {} ranges, {} unique values in {} atoms, {index_width}-bit indices",
				compiled.range_count(), unique.len(), atoms.len()
			),
			_ => log_verbose!(LOG_CAT, "{desc}: {} ranges", compiled.range_count()),
		}
		properties.push(compiled);
	}

	let build_classes = |specs: Vec<ClassSpec>| specs.iter()
		.map(|spec| {
			let set = extract_class(spec, &data.property_values, data.last_cp, catalog);
			log_verbose!(LOG_CAT, "Class '{}': {} codepoints, {} ranges", spec.name, set.singletons.len(), set.intervals.len());
			(spec.name.to_string(), set)
		})
		.collect::<BTreeMap<_, _>>();
	let classes = build_classes(classes());
	let classes_nocase = build_classes(classes_nocase());

	let property_aliases = catalog.names().groups().to_vec();
	let value_aliases = PROPERTIES.iter()
		.filter(|desc| desc.ty == PropertyType::Enum)
		.filter_map(|desc| catalog.values().get(desc.name).map(|groups| (desc.name.to_string(), groups.groups().to_vec())))
		.collect::<BTreeMap<_, _>>();

	log_info!(LOG_CAT, "Generated tables for {} properties and {} classes", properties.len(), classes.len() + classes_nocase.len());

	GeneratedTables {
		version: data.version.clone(),
		property_aliases,
		value_aliases,
		properties,
		classes,
		classes_nocase,
	}
}
