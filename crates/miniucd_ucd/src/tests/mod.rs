use std::fs;
use crate::*;

const PROPERTY_ALIASES: &str = "\
# PropertyAliases-16.0.0.txt

sc ; Script ; sc
gc ; General_Category
suc; Simple_Uppercase_Mapping
";

const VALUE_ALIASES: &str = "\
# PropertyValueAliases-16.0.0.txt

sc ; Latn ; Latin
gc ; Lu ; Uppercase_Letter
gc ; Ll ; Lowercase_Letter
";

fn catalog() -> PropertyCatalog {
	PropertyCatalog::new(PropertyAliases::parse(PROPERTY_ALIASES), ValueAliases::parse(VALUE_ALIASES))
}

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
	pairs.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect()
}

fn entry(first: u32, last: u32, pairs: &[(&str, &str)]) -> Entry {
	Entry { kind: EntryKind::Char, first, last, attrs: attrs(pairs) }
}

fn text(s: &str) -> Value {
	Value::Text(s.to_string())
}

#[test]
fn single_entry_end_to_end() {
	let catalog = catalog();
	let source = UcdSource {
		version: Some("16.0.0".to_string()),
		groups: vec![Group { attrs: attrs(&[("sc", "Latn")]), entries: vec![entry(0x41, 0x41, &[])] }],
	};

	let data = flatten(&catalog, &source, "16.0.0").unwrap();
	assert_eq!(data.last_cp, 0x41);
	assert_eq!(data.property_values.len(), 1);
	assert_eq!(data.property_values["sc"], [ChangePoint::new(0x41, text("Latn"))]);

	let by_long = catalog.names().get("Script").unwrap();
	let by_short = catalog.names().get("sc").unwrap();
	assert_eq!(by_long, by_short);
}

#[test]
fn resolve_prefers_entry_values() {
	let group = attrs(&[("gc", "Lu"), ("sc", "Latn")]);
	let entry = attrs(&[("gc", "Ll"), ("suc", "0041")]);
	let effective = resolve(&group, &entry);
	assert_eq!(effective.get("gc"), Some(&"Ll"));
	assert_eq!(effective.get("sc"), Some(&"Latn"));
	assert_eq!(effective.get("suc"), Some(&"0041"));
	assert_eq!(effective.get("bc"), None);
}

#[test]
fn emits_only_on_change() {
	let catalog = catalog();
	let mut flattener = Flattener::new(&catalog);

	let upper = Group {
		attrs: attrs(&[("gc", "Lu"), ("na", "ignored"), ("bogus", "x")]),
		// unordered on purpose
		entries: vec![entry(0x43, 0x43, &[]), entry(0x41, 0x41, &[]), entry(0x42, 0x42, &[])],
	};
	let lower = Group {
		attrs: attrs(&[("gc", "Ll")]),
		entries: vec![entry(0x61, 0x7A, &[("suc", "0041")])],
	};
	let more_lower = Group {
		attrs: attrs(&[("gc", "Ll")]),
		entries: vec![entry(0xDF, 0xDF, &[])],
	};
	flattener.process_group(&upper).unwrap();
	flattener.process_group(&lower).unwrap();
	flattener.process_group(&more_lower).unwrap();

	let (last_cp, values) = flattener.finish();
	assert_eq!(last_cp, 0xDF);
	// Names and unknown attributes are not recorded
	assert_eq!(values.keys().collect::<Vec<_>>(), ["gc", "suc"]);
	// The value persists across groups, so 0xDF does not start a new range
	assert_eq!(values["gc"], [ChangePoint::new(0x41, text("Lu")), ChangePoint::new(0x61, text("Ll"))]);
	assert_eq!(values["suc"], [ChangePoint::new(0x61, Value::Delta(-32))]);
}

#[test]
fn properties_never_get_a_default() {
	let catalog = catalog();
	let mut flattener = Flattener::new(&catalog);
	flattener.process_entry(&Attributes::new(), &entry(0x41, 0x41, &[("gc", "Lu")])).unwrap();
	flattener.process_entry(&Attributes::new(), &entry(0x100, 0x100, &[("sc", "Latn")])).unwrap();

	let (_, values) = flattener.finish();
	assert_eq!(values["gc"], [ChangePoint::new(0x41, text("Lu"))]);
	assert_eq!(values["sc"], [ChangePoint::new(0x100, text("Latn"))]);
	assert_eq!(value_at(&values["sc"], 0x41), None);
}

#[test]
fn change_points_strictly_increase() {
	let catalog = catalog();
	let mut flattener = Flattener::new(&catalog);
	flattener.process_entry(&Attributes::new(), &entry(0x100, 0x17F, &[("gc", "Lu")])).unwrap();
	let err = flattener.process_entry(&Attributes::new(), &entry(0x41, 0x41, &[("gc", "Ll")])).unwrap_err();
	assert!(matches!(err, UcdError::OutOfOrder { ref property, cp: 0x41, previous: 0x100 } if property == "gc"));
}

#[test]
fn flattening_is_deterministic() {
	let catalog = catalog();
	let xml = r#"<ucd><description>Unicode 16.0.0</description><repertoire>
		<group gc="Lu" sc="Latn"><char cp="0041"/><char cp="0042" suc="0041"/></group>
		<group gc="Ll" sc="Latn" uc="0053 0053"><char cp="00DF"/></group>
		<reserved first-cp="0378" last-cp="0379" gc="Cn" sc="Zzzz"/>
	</repertoire></ucd>"#;
	let source = UcdSource::parse(xml).unwrap();

	let first = flatten(&catalog, &source, "16.0.0").unwrap();
	let second = flatten(&catalog, &source, "16.0.0").unwrap();
	assert_eq!(first, second);

	assert_eq!(first.last_cp, 0x379);
	assert_eq!(first.property_values["suc"], [ChangePoint::new(0x42, Value::Delta(-1))]);
	assert_eq!(first.property_values["uc"], [ChangePoint::new(0xDF, Value::Codepoints(vec![0x53, 0x53]))]);
	for points in first.property_values.values() {
		assert!(points.windows(2).all(|pair| pair[0].cp < pair[1].cp));
	}
}

#[test]
fn invalid_hex_aborts_flattening() {
	let catalog = catalog();
	let source = UcdSource {
		version: None,
		groups: vec![Group { attrs: Attributes::new(), entries: vec![entry(0x61, 0x61, &[("suc", "00ZZ")])] }],
	};
	let err = flatten(&catalog, &source, "16.0.0").unwrap_err();
	assert!(matches!(err, UcdError::InvalidHex { ref property, cp: 0x61, .. } if property == "suc"));
}

#[test]
fn snapshot_round_trip() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("ucd.json");

	let mut data = UcdData { version: "16.0.0".to_string(), last_cp: 0x10FFFF, property_values: PropertyValues::new() };
	data.property_values.insert("gc".to_string(), vec![ChangePoint::new(0, text("Cc")), ChangePoint::new(0x20, text("Zs"))]);
	data.property_values.insert("suc".to_string(), vec![ChangePoint::new(0, Value::Delta(0)), ChangePoint::new(0x61, Value::Delta(-32))]);
	data.property_values.insert("uc".to_string(), vec![ChangePoint::new(0xDF, Value::Codepoints(vec![0x53, 0x53]))]);
	data.property_values.insert("scx".to_string(), vec![
		ChangePoint::new(0, Value::Tokens(vec![])),
		ChangePoint::new(0x41, text("Latn")),
		ChangePoint::new(0x660, Value::Tokens(vec!["Arab".to_string(), "Thaa".to_string()])),
	]);
	data.save(&path).unwrap();

	let json = fs::read_to_string(&path).unwrap();
	assert!(json.contains("\"lastCp\": 1114111"));
	assert!(json.contains("\"propertyValues\""));

	assert_eq!(UcdData::load(&path, "16.0.0").unwrap(), data);
	// No temporary file is left behind
	assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

	let err = UcdData::load(&path, "15.1.0").unwrap_err();
	assert!(matches!(err, UcdError::VersionMismatch { ref expected, ref found, .. } if expected == "15.1.0" && found == "16.0.0"));
}

#[test]
fn missing_inputs_are_reported() {
	let dir = tempfile::tempdir().unwrap();
	let err = UcdData::load(&dir.path().join("ucd.json"), "16.0.0").unwrap_err();
	assert!(matches!(err, UcdError::MissingFile { .. }));

	let err = load_catalog(dir.path(), "16.0.0").unwrap_err();
	assert!(matches!(err, UcdError::MissingFile { ref path } if path.ends_with("PropertyAliases.txt")));
}

#[test]
fn parse_from_ucd_directory() {
	let dir = tempfile::tempdir().unwrap();
	fs::write(dir.path().join(PropertyAliases::FILE_NAME), PROPERTY_ALIASES).unwrap();
	fs::write(dir.path().join(ValueAliases::FILE_NAME), VALUE_ALIASES).unwrap();
	fs::write(dir.path().join(UcdSource::FILE_NAME), r#"<ucd><description>Unicode 16.0.0</description><repertoire>
		<group sc="Latn"><char cp="0041"/></group>
	</repertoire></ucd>"#).unwrap();

	let catalog = load_catalog(dir.path(), "16.0.0").unwrap();
	let data = parse_ucd(&catalog, dir.path(), "16.0.0").unwrap();
	assert_eq!(data.property_values["sc"], [ChangePoint::new(0x41, text("Latn"))]);

	let err = load_catalog(dir.path(), "17.0.0").unwrap_err();
	assert!(matches!(err, UcdError::VersionMismatch { ref artifact, .. } if artifact == PropertyAliases::FILE_NAME));
}
