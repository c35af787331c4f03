//! Range lookup tables for single properties.

use serde::Serialize;
use miniucd_ucd::{ChangePoint, PropertyCatalog, PropertyDescriptor, PropertyType, Value};
use crate::{indexer::decode_atoms, Atom, ValueIndex};

/// Narrowest unsigned integer width, in bits, able to hold `max`
pub fn index_width(max: usize) -> u32 {
	if max < 0x100 {
		8
	} else if max < 0x10000 {
		16
	} else {
		32
	}
}

/// Per-range values of a property
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RangeValues {
	/// Consecutive ranges alternate, so only the value of the first range is stored
	///
	/// Codepoints without a value read as false, the first range always starts at codepoint 0.
	#[serde(rename_all = "camelCase")]
	Boolean { first_value: bool },
	/// Enum value per range
	Enum { values: Vec<String> },
	/// Codepoint delta per range
	Delta { deltas: Vec<i32> },
	/// Atom index per range
	#[serde(rename_all = "camelCase")]
	Indexed {
		indices     : Vec<usize>,
		index_width : u32,
		unique      : Vec<Value>,
		atoms       : Vec<Atom>,
		/// Width of the enum values stored in the atoms of an enumList property
		#[serde(skip_serializing_if = "Option::is_none")]
		atom_width  : Option<u32>,
	},
}

/// Range lookup tables of a property
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledProperty {
	pub name         : String,
	#[serde(rename = "type")]
	pub ty           : PropertyType,
	/// Start of every range but the first one, which starts at codepoint 0
	pub range_starts : Vec<u32>,
	/// Set when the property has no value at codepoint 0, the first range then has no value either.
	/// Never set for boolean properties, see [`RangeValues::Boolean`]
	#[serde(skip_serializing_if = "core::ops::Not::not")]
	pub starts_unset : bool,
	pub values       : RangeValues,
}

impl CompiledProperty {
	/// Build the tables of a property from its change points
	pub fn compile(desc: &PropertyDescriptor, points: &[ChangePoint], catalog: &PropertyCatalog) -> Self {
		let is_yes = |point: &ChangePoint| point.value.as_text() == Some("Y");
		let mut starts_unset = points.first().map_or(true, |point| point.cp != 0);
		let mut range_starts = points.iter()
			.map(|point| point.cp)
			.filter(|cp| *cp != 0)
			.collect::<Vec<_>>();

		if desc.ty == PropertyType::Boolean && starts_unset {
			// Unset reads as N, so a leading N range merges with the unset one
			if points.first().is_some_and(|point| !is_yes(point)) {
				range_starts.remove(0);
			}
			starts_unset = false;
		}

		let values = match desc.ty {
			PropertyType::Boolean => RangeValues::Boolean {
				first_value: points.first().is_some_and(|point| point.cp == 0 && is_yes(point)),
			},
			PropertyType::Enum => RangeValues::Enum {
				values: points.iter().map(|point| point.value.to_string()).collect(),
			},
			PropertyType::Cp => RangeValues::Delta {
				deltas: points.iter()
					.map(|point| match point.value {
						Value::Delta(delta) => delta,
						_ => 0,
					})
					.collect(),
			},
			_ => {
				let index = ValueIndex::build(points.iter().map(|point| &point.value), desc.ty);
				let max_index = index.indices.iter().copied().max().unwrap_or(0);
				let atom_width = desc.enum_ref.map(|enum_ref| {
					let count = catalog.values().get(enum_ref).map_or(0, |groups| groups.len());
					index_width(count)
				});
				RangeValues::Indexed {
					indices: index.indices,
					index_width: index_width(max_index),
					unique: index.unique,
					atoms: index.atoms,
					atom_width,
				}
			},
		};

		Self {
			name: desc.name.to_string(),
			ty: desc.ty,
			range_starts,
			starts_unset,
			values,
		}
	}

	/// Number of ranges
	pub fn range_count(&self) -> usize {
		self.range_starts.len() + if self.starts_unset { 0 } else { 1 }
	}

	/// Look up the value of the property at `cp`, the same way the generated accessor does
	pub fn lookup(&self, cp: u32) -> Option<Value> {
		let range = self.range_starts.partition_point(|start| *start <= cp);
		let range = if self.starts_unset { range.checked_sub(1)? } else { range };

		match &self.values {
			RangeValues::Boolean { first_value } => {
				let value = *first_value ^ (range % 2 == 1);
				Some(Value::Text(if value { "Y" } else { "N" }.to_string()))
			},
			RangeValues::Enum { values } => values.get(range).map(|value| Value::Text(value.clone())),
			RangeValues::Delta { deltas } => deltas.get(range).map(|delta| Value::Delta(*delta)),
			RangeValues::Indexed { indices, atoms, .. } => decode_atoms(atoms, *indices.get(range)?, self.ty),
		}
	}
}
