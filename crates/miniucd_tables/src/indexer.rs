use std::collections::{BTreeMap, HashMap};
use serde::Serialize;
use miniucd_ucd::{strategy, PropertyType, Value};

/// One slot of the packed value storage
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(untagged)]
pub enum Atom {
	/// Codepoint, delta or terminator
	Int(i64),
	/// String table entry or enum value name
	Name(String),
}

/// Deduplicated values of a property
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ValueIndex {
	/// Distinct values, sorted by their canonical text
	pub unique  : Vec<Value>,
	/// Index into `atoms` for each input value
	pub indices : Vec<usize>,
	/// Packed storage of the unique values
	pub atoms   : Vec<Atom>,
}

impl ValueIndex {
	/// Deduplicate `values` and pack them into atoms
	///
	/// numeric and string values take a single atom each, as they index a string table.
	/// Other values are stored inline as their elements followed by a `0` terminator, the zero delta and the empty list only store the terminator.
	pub fn build<'a>(values: impl IntoIterator<Item = &'a Value>, ty: PropertyType) -> Self {
		let strategy = strategy(ty);
		let values = values.into_iter().collect::<Vec<_>>();

		let mut sorted: BTreeMap<String, &Value> = BTreeMap::new();
		for &value in &values {
			sorted.insert((strategy.canonical)(value), value);
		}

		let mut unique = Vec::with_capacity(sorted.len());
		let mut atoms = Vec::new();
		let mut offsets = HashMap::with_capacity(sorted.len());
		for (key, value) in sorted {
			offsets.insert(key, atoms.len());

			let start = atoms.len();
			push_atoms(&mut atoms, value, ty);
			debug_assert_eq!(atoms.len() - start, (strategy.slots)(value));

			unique.push(value.clone());
		}

		let indices = values.iter()
			.map(|&value| offsets[&(strategy.canonical)(value)])
			.collect();

		Self { unique, indices, atoms }
	}

	/// Get the unique value stored at an atom index
	pub fn value_at(&self, index: usize, ty: PropertyType) -> Option<Value> {
		decode_atoms(&self.atoms, index, ty)
	}
}

fn push_atoms(atoms: &mut Vec<Atom>, value: &Value, ty: PropertyType) {
	if matches!(ty, PropertyType::Numeric | PropertyType::String) {
		atoms.push(Atom::Name(value.to_string()));
		return;
	}

	if !value.is_sentinel() {
		match value {
			Value::Text(text) => atoms.push(Atom::Name(text.clone())),
			Value::Delta(delta) => atoms.push(Atom::Int(*delta as i64)),
			Value::Tokens(tokens) => atoms.extend(tokens.iter().map(|token| Atom::Name(token.clone()))),
			Value::Codepoints(cps) => atoms.extend(cps.iter().map(|cp| Atom::Int(*cp as i64))),
		}
	}
	atoms.push(Atom::Int(0));
}

/// Read back a value from the packed atoms, this is what a runtime accessor does
pub(crate) fn decode_atoms(atoms: &[Atom], index: usize, ty: PropertyType) -> Option<Value> {
	if matches!(ty, PropertyType::Numeric | PropertyType::String) {
		return match atoms.get(index)? {
			Atom::Name(text) => Some(Value::Text(text.clone())),
			Atom::Int(_) => None,
		};
	}

	let elements = &atoms[index.min(atoms.len())..];
	let len = elements.iter().position(|atom| *atom == Atom::Int(0))?;
	let elements = &elements[..len];

	let value = match ty {
		PropertyType::Cp | PropertyType::Mcp => {
			let ints = elements.iter()
				.map(|atom| match atom {
					Atom::Int(val) => Some(*val),
					Atom::Name(_) => None,
				})
				.collect::<Option<Vec<_>>>()?;
			match ints.as_slice() {
				[] => Value::Delta(0),
				[delta] => Value::Delta(i32::try_from(*delta).ok()?),
				_ => Value::Codepoints(ints.iter().map(|cp| u32::try_from(*cp).ok()).collect::<Option<_>>()?),
			}
		},
		_ => {
			let mut names = elements.iter()
				.map(|atom| match atom {
					Atom::Name(name) => Some(name.clone()),
					Atom::Int(_) => None,
				})
				.collect::<Option<Vec<_>>>()?;
			if names.len() == 1 {
				Value::Text(names.remove(0))
			} else {
				Value::Tokens(names)
			}
		},
	};
	Some(value)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn text(s: &str) -> Value {
		Value::Text(s.to_string())
	}

	#[test]
	fn unique_values_are_sorted_by_canonical_text() {
		let values = [text("1/2"), text("10"), text("1/2"), text("2")];
		let index = ValueIndex::build(&values, PropertyType::Numeric);
		// byte order, not numeric order
		assert_eq!(index.unique, [text("1/2"), text("10"), text("2")]);
		assert_eq!(index.indices, [0, 1, 0, 2]);
		assert_eq!(index.atoms, [Atom::Name("1/2".to_string()), Atom::Name("10".to_string()), Atom::Name("2".to_string())]);
	}

	#[test]
	fn inline_arrays_reserve_terminator_slot() {
		let values = [Value::Delta(0), Value::Delta(-32), Value::Codepoints(vec![0x53, 0x53]), Value::Delta(-32), Value::Delta(0)];
		let index = ValueIndex::build(&values, PropertyType::Mcp);

		// "-32" < "0" < "0x0053 0x0053"
		assert_eq!(index.unique, [Value::Delta(-32), Value::Delta(0), Value::Codepoints(vec![0x53, 0x53])]);
		assert_eq!(index.atoms, [
			Atom::Int(-32), Atom::Int(0),
			Atom::Int(0),
			Atom::Int(0x53), Atom::Int(0x53), Atom::Int(0),
		]);
		assert_eq!(index.indices, [2, 0, 3, 0, 2]);
	}

	#[test]
	fn index_follows_canonical_form() {
		let values = [
			Value::Tokens(vec![]),
			text("Latn"),
			Value::Tokens(vec!["Arab".to_string(), "Copt".to_string()]),
			text("Latn"),
			Value::Tokens(vec!["Arab".to_string(), "Copt".to_string()]),
		];
		let index = ValueIndex::build(&values, PropertyType::EnumList);
		for (a, va) in values.iter().enumerate() {
			for (b, vb) in values.iter().enumerate() {
				assert_eq!(index.indices[a] == index.indices[b], va.to_string() == vb.to_string());
			}
		}
	}

	#[test]
	fn index_counts_preceding_slots() {
		let values = [
			Value::Tokens(vec!["Arab".to_string(), "Syrc".to_string(), "Thaa".to_string()]),
			text("Latn"),
			Value::Tokens(vec![]),
			text("Grek"),
		];
		let ty = PropertyType::EnumList;
		let index = ValueIndex::build(&values, ty);
		let slots = strategy(ty).slots;

		let mut expected = 0;
		for value in &index.unique {
			let idx = index.indices[values.iter().position(|val| val == value).unwrap()];
			assert_eq!(idx, expected);
			assert_eq!(index.value_at(idx, ty).as_ref(), Some(value));
			expected += slots(value);
		}
		assert_eq!(expected, index.atoms.len());
	}
}
