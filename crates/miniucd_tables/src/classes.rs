//! Character classes of the regex engine, as sets of codepoints and codepoint ranges.

use serde::Serialize;
use miniucd_logging::{log_warning, LogCategory};
use miniucd_ucd::{ChangePoint, PropertyCatalog, PropertyValues, Value};

const LOG_CAT : LogCategory = LogCategory::new("Tables");

/// Condition on the value of a property
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Predicate {
	Equals(String),
	OneOf(Vec<String>),
}

impl Predicate {
	pub fn equals(value: &str) -> Self {
		Predicate::Equals(value.to_string())
	}

	pub fn one_of(values: &[&str]) -> Self {
		Predicate::OneOf(values.iter().map(|value| value.to_string()).collect())
	}

	/// Check a value, using its canonical text
	pub fn matches(&self, value: &Value) -> bool {
		let text = value.to_string();
		match self {
			Predicate::Equals(expected) => text == *expected,
			Predicate::OneOf(expected) => expected.iter().any(|expected| text == *expected),
		}
	}

	/// Replace value aliases, like `Uppercase_Letter`, by the spelling used in the data
	pub fn resolve(&self, catalog: &PropertyCatalog, property: &str) -> Self {
		let resolve = |value: &String| catalog.canonical_value(property, value).unwrap_or(value.as_str()).to_string();
		match self {
			Predicate::Equals(value) => Predicate::Equals(resolve(value)),
			Predicate::OneOf(values) => Predicate::OneOf(values.iter().map(resolve).collect()),
		}
	}
}

/// Definition of a character class
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ClassSpec {
	pub name     : &'static str,
	/// Literal characters
	pub chars    : Vec<char>,
	/// Literal closed character ranges
	pub ranges   : Vec<(char, char)>,
	/// Characters for which a property satisfies a predicate
	pub criteria : Vec<(&'static str, Predicate)>,
}

impl ClassSpec {
	fn new(name: &'static str) -> Self {
		Self { name, chars: Vec::new(), ranges: Vec::new(), criteria: Vec::new() }
	}

	fn with_chars(mut self, chars: &[char]) -> Self {
		self.chars.extend_from_slice(chars);
		self
	}

	fn with_range(mut self, first: char, last: char) -> Self {
		self.ranges.push((first, last));
		self
	}

	fn with_property(mut self, property: &'static str, predicate: Predicate) -> Self {
		self.criteria.push((property, predicate));
		self
	}
}

/// Codepoints and closed codepoint ranges of a class
///
/// Ranges are kept as found, touching or overlapping ranges are not merged.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct CharSet {
	pub singletons : Vec<u32>,
	pub intervals  : Vec<(u32, u32)>,
}

/// Add the runs of codepoints whose value satisfies `pred` to `set`
///
/// A run still open after the last change point extends to `domain_max`.
pub fn extract_runs(points: &[ChangePoint], domain_max: u32, mut pred: impl FnMut(&Value) -> bool, set: &mut CharSet) {
	let mut run_start = None;
	for point in points {
		if pred(&point.value) {
			if run_start.is_none() {
				run_start = Some(point.cp);
			}
		} else if point.cp != 0 {
			if let Some(start) = run_start.take() {
				if point.cp - start == 1 {
					set.singletons.push(start);
				} else {
					set.intervals.push((start, point.cp - 1));
				}
			}
		}
	}

	if let Some(start) = run_start {
		set.intervals.push((start, domain_max));
	}
}

/// Compute the codepoints of a class
pub fn extract_class(spec: &ClassSpec, values: &PropertyValues, domain_max: u32, catalog: &PropertyCatalog) -> CharSet {
	let mut set = CharSet::default();
	set.singletons.extend(spec.chars.iter().map(|ch| *ch as u32));
	set.intervals.extend(spec.ranges.iter().map(|(first, last)| (*first as u32, *last as u32)));

	for (property, predicate) in &spec.criteria {
		let Some(points) = values.get(*property) else {
			log_warning!(LOG_CAT, "Class '{}' uses property '{property}', which has no values", spec.name);
			continue;
		};
		let predicate = predicate.resolve(catalog, property);
		extract_runs(points, domain_max, |value| predicate.matches(value), &mut set);
	}
	set
}

const LETTERS: &[&str] = &["Lu", "Ll", "Lt", "Lm", "Lo"];
const CASED_LETTERS: &[&str] = &["Lu", "Ll", "Lt"];
const NUMBERS: &[&str] = &["Nd", "Nl", "No"];
const PUNCTUATION: &[&str] = &["Pc", "Pd", "Ps", "Pe", "Pi", "Pf", "Po"];
const MARKS: &[&str] = &["Mn", "Mc", "Me"];
const SYMBOLS: &[&str] = &["Sm", "Sc", "Sk", "So"];
const SPACE_SEPARATOR: &[&str] = &["Zs"];

fn categories(groups: &[&[&str]]) -> Predicate {
	Predicate::one_of(&groups.concat())
}

/// The POSIX classes of the regex engine
pub fn classes() -> Vec<ClassSpec> {
	vec![
		ClassSpec::new("alnum").with_property("gc", categories(&[LETTERS, NUMBERS])),
		ClassSpec::new("alpha").with_property("gc", categories(&[LETTERS])),
		ClassSpec::new("ascii").with_range('\0', '\x7F'),
		ClassSpec::new("blank").with_chars(&['\t']).with_property("gc", Predicate::equals("Zs")),
		ClassSpec::new("cntrl").with_property("gc", Predicate::equals("Cc")),
		ClassSpec::new("digit").with_property("gc", Predicate::equals("Nd")),
		ClassSpec::new("graph").with_property("gc", categories(&[LETTERS, MARKS, NUMBERS, PUNCTUATION, SYMBOLS])),
		ClassSpec::new("lower").with_property("gc", Predicate::equals("Ll")),
		ClassSpec::new("print").with_property("gc", categories(&[LETTERS, MARKS, NUMBERS, PUNCTUATION, SYMBOLS, SPACE_SEPARATOR])),
		ClassSpec::new("punct").with_property("gc", categories(&[PUNCTUATION])),
		ClassSpec::new("space").with_property("WSpace", Predicate::equals("Y")),
		ClassSpec::new("upper").with_property("gc", Predicate::equals("Lu")),
		ClassSpec::new("word").with_chars(&['_']).with_property("gc", categories(&[LETTERS, NUMBERS])),
		ClassSpec::new("xdigit").with_range('0', '9').with_range('A', 'F').with_range('a', 'f'),
	]
}

/// Classes that differ when matching case-insensitively
pub fn classes_nocase() -> Vec<ClassSpec> {
	vec![
		ClassSpec::new("lower").with_property("gc", categories(&[CASED_LETTERS])),
		ClassSpec::new("upper").with_property("gc", categories(&[CASED_LETTERS])),
	]
}
