use core::fmt;
use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Highest Unicode codepoint
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// Typed value of a property at a codepoint
///
/// Serialized without a tag: text as a JSON string, deltas as integers, token lists as string arrays and codepoint lists as integer arrays.
/// `Codepoints` is never empty, so an empty array always reads back as the empty token list.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
	/// Raw text: numeric, string, enum and boolean values, or a single enumList token
	Text(String),
	/// Signed offset from the source codepoint to a related codepoint, 0 means none
	Delta(i32),
	/// Several enumList tokens, empty for the "no value" marker
	Tokens(Vec<String>),
	/// Several related codepoints, as absolute values
	Codepoints(Vec<u32>),
}

impl Value {
	/// The zero delta or the empty token list
	pub fn is_sentinel(&self) -> bool {
		match self {
			Value::Delta(delta) => *delta == 0,
			Value::Tokens(tokens) => tokens.is_empty(),
			_ => false,
		}
	}

	/// Number of elements when the value is embedded as an inline array
	pub fn element_count(&self) -> usize {
		match self {
			Value::Text(_) | Value::Delta(_) => 1,
			Value::Tokens(tokens) => tokens.len(),
			Value::Codepoints(cps) => cps.len(),
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Value::Text(text) => Some(text),
			_ => None,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Text(text) => f.write_str(text),
			Value::Delta(delta) => write!(f, "{delta}"),
			Value::Tokens(tokens) => {
				for (idx, token) in tokens.iter().enumerate() {
					if idx != 0 {
						f.write_str(" ")?;
					}
					f.write_str(token)?;
				}
				Ok(())
			},
			Value::Codepoints(cps) => {
				for (idx, cp) in cps.iter().enumerate() {
					if idx != 0 {
						f.write_str(" ")?;
					}
					write!(f, "{cp:#06X}")?;
				}
				Ok(())
			},
		}
	}
}

/// First codepoint at which a property takes a value
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ChangePoint {
	pub cp    : u32,
	pub value : Value,
}

impl ChangePoint {
	pub fn new(cp: u32, value: Value) -> Self {
		Self { cp, value }
	}
}

/// Change points of every property, keyed by short property name, each list in strictly increasing codepoint order
pub type PropertyValues = BTreeMap<String, Vec<ChangePoint>>;

/// Get the value of a property at `cp`, i.e. the value of the last change point at or before `cp`
pub fn value_at(points: &[ChangePoint], cp: u32) -> Option<&Value> {
	let idx = points.partition_point(|point| point.cp <= cp);
	idx.checked_sub(1).map(|idx| &points[idx].value)
}
