use miniucd_ucd::{find_property, flatten, value_at, PropertyAliases, PropertyCatalog, UcdData, UcdSource, Value, ValueAliases};
use crate::*;

const PROPERTY_ALIASES: &str = "\
# PropertyAliases-16.0.0.txt

gc ; General_Category
sc ; Script
scx; Script_Extensions
WSpace ; White_Space ; space
";

const VALUE_ALIASES: &str = "\
# PropertyValueAliases-16.0.0.txt

gc ; Cc ; Control ; cntrl
gc ; Ll ; Lowercase_Letter
gc ; Lu ; Uppercase_Letter
gc ; L  ; Letter # Ll | Lm | Lo | Lt | Lu
sc ; Latn ; Latin
sc ; Zyyy ; Common
";

const XML: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<ucd xmlns="http://www.unicode.org/ns/2003/ucd/1.0">
  <description>Unicode 16.0.0</description>
  <repertoire>
    <group gc="Cc" sc="Zyyy" scx="Zyyy" WSpace="N" suc="#" uc="#">
      <char first-cp="0000" last-cp="0008"/>
      <char cp="0009" WSpace="Y"/>
      <char first-cp="000A" last-cp="001F"/>
    </group>
    <group gc="Po" sc="Zyyy" scx="Zyyy" WSpace="N" suc="#" uc="#">
      <char cp="0020" gc="Zs" WSpace="Y"/>
      <char first-cp="0021" last-cp="002F"/>
      <char first-cp="0030" last-cp="0039" gc="Nd"/>
      <char first-cp="003A" last-cp="0040"/>
    </group>
    <group gc="Lu" sc="Latn" scx="Latn" WSpace="N" suc="#" uc="#">
      <char first-cp="0041" last-cp="005A"/>
    </group>
    <group gc="Ll" sc="Latn" scx="Latn Grek" WSpace="N">
      <char cp="0061" suc="0041" uc="0041"/>
      <char cp="0062" suc="0042" uc="0042"/>
      <char cp="00DF" suc="#" uc="0053 0053"/>
    </group>
  </repertoire>
</ucd>
"##;

fn catalog() -> PropertyCatalog {
	PropertyCatalog::new(PropertyAliases::parse(PROPERTY_ALIASES), ValueAliases::parse(VALUE_ALIASES))
}

fn data(catalog: &PropertyCatalog) -> UcdData {
	let source = UcdSource::parse(XML).unwrap();
	flatten(catalog, &source, "16.0.0").unwrap()
}

fn property<'a>(tables: &'a GeneratedTables, name: &str) -> &'a CompiledProperty {
	tables.properties.iter().find(|prop| prop.name == name).unwrap()
}

#[test]
fn compiled_lookups_match_change_points() {
	let catalog = catalog();
	let data = data(&catalog);
	let tables = generate(&data, &catalog);

	assert_eq!(tables.version, "16.0.0");
	assert_eq!(tables.properties.len(), data.property_values.len());
	for compiled in &tables.properties {
		let points = &data.property_values[&compiled.name];
		for cp in 0..=0x100 {
			assert_eq!(compiled.lookup(cp).as_ref(), value_at(points, cp), "{} at U+{cp:04X}", compiled.name);
		}
	}
}

#[test]
fn property_tables_per_type() {
	let catalog = catalog();
	let tables = generate(&data(&catalog), &catalog);

	let gc = property(&tables, "gc");
	assert_eq!(gc.range_starts, [0x20, 0x21, 0x30, 0x3A, 0x41, 0x61]);
	assert!(!gc.starts_unset);

	let space = property(&tables, "WSpace");
	assert_eq!(space.values, RangeValues::Boolean { first_value: false });
	assert_eq!(space.range_starts, [0x09, 0x0A, 0x20, 0x21]);

	let suc = property(&tables, "suc");
	assert_eq!(suc.values, RangeValues::Delta { deltas: vec![0, -32, 0] });

	let uc = property(&tables, "uc");
	assert_eq!(uc.lookup(0xDF), Some(Value::Codepoints(vec![0x53, 0x53])));

	// enum values of scx come from sc
	let scx = property(&tables, "scx");
	let RangeValues::Indexed { atom_width, unique, .. } = &scx.values else { panic!("scx is not indexed") };
	assert_eq!(*atom_width, Some(8));
	assert_eq!(unique.len(), 3);
	assert_eq!(find_property(&scx.name).map(|desc| desc.enum_ref), Some(Some("sc")));
}

#[test]
fn classes_from_flattened_data() {
	let catalog = catalog();
	let tables = generate(&data(&catalog), &catalog);

	let space = &tables.classes["space"];
	assert_eq!(space.singletons, [0x09, 0x20]);
	assert!(space.intervals.is_empty());

	assert_eq!(tables.classes["digit"].intervals, [(0x30, 0x39)]);
	assert_eq!(tables.classes["upper"].intervals, [(0x41, 0x60)]);
	// open until the last codepoint of the repertoire
	assert_eq!(tables.classes["alpha"].intervals, [(0x41, 0xDF)]);
	assert_eq!(tables.classes["cntrl"].intervals, [(0, 0x1F)]);

	assert_eq!(tables.classes_nocase.len(), 2);
	assert_eq!(tables.classes_nocase["upper"].intervals, [(0x41, 0xDF)]);
	assert_eq!(tables.classes.len(), classes().len());
}

#[test]
fn aliases_are_carried_over() {
	let catalog = catalog();
	let tables = generate(&data(&catalog), &catalog);

	assert_eq!(tables.property_aliases.len(), 4);
	assert!(tables.property_aliases.contains(&vec!["WSpace".to_string(), "White_Space".to_string(), "space".to_string()]));
	assert_eq!(tables.value_aliases["gc"].len(), 3);
	assert_eq!(tables.value_aliases["sc"][1], ["Zyyy", "Common"]);
	assert!(!tables.value_aliases.contains_key("scx"));
}

#[test]
fn save_writes_json_in_output_dir() {
	let catalog = catalog();
	let tables = generate(&data(&catalog), &catalog);

	let dir = tempfile::tempdir().unwrap();
	tables.save(dir.path()).unwrap();
	// saving again replaces the file
	tables.save(dir.path()).unwrap();

	let json = std::fs::read_to_string(dir.path().join(GeneratedTables::FILE_NAME)).unwrap();
	let json: serde_json::Value = serde_json::from_str(&json).unwrap();
	assert_eq!(json["version"], "16.0.0");
	assert_eq!(json["classes"]["space"]["singletons"], serde_json::json!([9, 32]));
	assert_eq!(json["classes"]["digit"]["intervals"], serde_json::json!([[48, 57]]));
	assert!(json["properties"].as_array().is_some_and(|props| props.iter().any(|prop| prop["name"] == "gc" && prop["values"]["kind"] == "enum")));
	assert!(!dir.path().join(format!("{}.tmp", GeneratedTables::FILE_NAME)).exists());
}

#[test]
fn generation_is_deterministic() {
	let catalog = catalog();
	let data = data(&catalog);
	assert_eq!(generate(&data, &catalog), generate(&data, &catalog));
}
