//! Per-type handling of property values.
//!
//! Every [`PropertyType`] maps to a [`TypeStrategy`], so the flattener and the table generator never need to look at property names.

use crate::{PropertyType, UcdError, UcdResult, Value, MAX_CODEPOINT};

/// Value handling for one property type
pub struct TypeStrategy {
	/// Convert the raw text of a property at a codepoint into a typed value
	pub normalize : fn(property: &str, cp: u32, text: &str) -> UcdResult<Value>,
	/// Key used for value equality and sort order
	pub canonical : fn(value: &Value) -> String,
	/// Number of atom slots a value takes in the packed value storage
	pub slots     : fn(value: &Value) -> usize,
}

/// Get the value handling for a property type
pub fn strategy(ty: PropertyType) -> &'static TypeStrategy {
	match ty {
		PropertyType::Cp => &CP_STRATEGY,
		PropertyType::Mcp => &MCP_STRATEGY,
		PropertyType::EnumList => &ENUM_LIST_STRATEGY,
		PropertyType::Numeric | PropertyType::String => &STRING_TABLE_STRATEGY,
		PropertyType::Enum | PropertyType::Boolean | PropertyType::Name | PropertyType::Deprecated => &TEXT_STRATEGY,
	}
}

static CP_STRATEGY: TypeStrategy = TypeStrategy { normalize: normalize_cp, canonical, slots: inline_slots };
static MCP_STRATEGY: TypeStrategy = TypeStrategy { normalize: normalize_mcp, canonical, slots: inline_slots };
static ENUM_LIST_STRATEGY: TypeStrategy = TypeStrategy { normalize: normalize_enum_list, canonical, slots: inline_slots };
static STRING_TABLE_STRATEGY: TypeStrategy = TypeStrategy { normalize: normalize_text, canonical, slots: single_slot };
static TEXT_STRATEGY: TypeStrategy = TypeStrategy { normalize: normalize_text, canonical, slots: inline_slots };

/// `""` and `"#"` both mean "no value" in the UCD XML
fn is_marker(text: &str) -> bool {
	text.is_empty() || text == "#"
}

fn invalid_hex(property: &str, cp: u32, text: &str) -> UcdError {
	UcdError::InvalidHex {
		property: property.to_string(),
		cp,
		text: text.to_string(),
	}
}

/// Parse a codepoint target, which must be a valid codepoint
fn parse_hex(property: &str, cp: u32, text: &str) -> UcdResult<u32> {
	match u32::from_str_radix(text, 16) {
		Ok(target) if target <= MAX_CODEPOINT => Ok(target),
		_ => Err(invalid_hex(property, cp, text)),
	}
}

fn delta(property: &str, cp: u32, target: u32, text: &str) -> UcdResult<Value> {
	i32::try_from(i64::from(target) - i64::from(cp))
		.map(Value::Delta)
		.map_err(|_| invalid_hex(property, cp, text))
}

fn normalize_cp(property: &str, cp: u32, text: &str) -> UcdResult<Value> {
	if is_marker(text) {
		return Ok(Value::Delta(0));
	}
	let text = text.trim();
	let target = parse_hex(property, cp, text)?;
	delta(property, cp, target, text)
}

fn normalize_mcp(property: &str, cp: u32, text: &str) -> UcdResult<Value> {
	if is_marker(text) {
		return Ok(Value::Delta(0));
	}

	let targets = text.split_whitespace()
		.map(|hex| parse_hex(property, cp, hex))
		.collect::<UcdResult<Vec<_>>>()?;
	match targets.as_slice() {
		[] => Ok(Value::Delta(0)),
		[target] => delta(property, cp, *target, text),
		_ => Ok(Value::Codepoints(targets)),
	}
}

fn normalize_enum_list(_property: &str, _cp: u32, text: &str) -> UcdResult<Value> {
	if is_marker(text) {
		return Ok(Value::Tokens(Vec::new()));
	}

	let mut tokens = text.split_whitespace().map(str::to_string).collect::<Vec<_>>();
	if tokens.len() == 1 {
		Ok(Value::Text(tokens.remove(0)))
	} else {
		Ok(Value::Tokens(tokens))
	}
}

fn normalize_text(_property: &str, _cp: u32, text: &str) -> UcdResult<Value> {
	Ok(Value::Text(text.to_string()))
}

fn canonical(value: &Value) -> String {
	value.to_string()
}

/// numeric and string values index a string table
fn single_slot(_value: &Value) -> usize {
	1
}

/// The sentinel only takes the terminator slot, other values take their elements plus the terminator
fn inline_slots(value: &Value) -> usize {
	if value.is_sentinel() {
		1
	} else {
		1 + value.element_count()
	}
}
