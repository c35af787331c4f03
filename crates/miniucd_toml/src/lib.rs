//! Small TOML reader for miniucd settings files.
//!
//! Supports key/value pairs, dotted keys, `[table]` headers, inline tables, arrays, basic and literal strings,
//! integers (decimal, hex, octal, binary), floats and booleans. Array tables (`[[...]]`) and dates are not supported.

use core::fmt;
use std::collections::HashMap;
use miniucd_parser_utils::{str_parser::*, ParserError};

/// TOML parsing error
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TomlParseError(pub ParserError);

impl fmt::Display for TomlParseError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Failed to parse toml at {}", self.0)
	}
}

impl std::error::Error for TomlParseError {}

#[derive(Clone, PartialEq, Debug)]
pub enum Item {
	String(String),
	Integer(i64),
	Float(f64),
	Boolean(bool),
	Array(Vec<Item>),
	Table(Table),
}

/// Toml table, keeping keys in insertion order
#[derive(Clone, Default, PartialEq, Debug)]
pub struct Table {
	keys    : Vec<String>,
	items   : Vec<Item>,
	mapping : HashMap<String, usize>,
}

impl<'a> IntoIterator for &'a Table {
	type Item = (&'a str, &'a Item);
	type IntoIter = TableIter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl Table {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an item to the table, returns `false` if the key already exists
	pub fn push(&mut self, key: String, item: Item) -> bool {
		if self.mapping.contains_key(&key) {
			return false;
		}
		self.mapping.insert(key.clone(), self.items.len());
		self.keys.push(key);
		self.items.push(item);
		true
	}

	/// Append an item with a dotted key to the table
	///
	/// # Error
	///
	/// If the item could not be added, because a sub-key points to a non-table or the final key already exists, the index of the failing key is returned
	pub fn push_multi_key(&mut self, keys: &[String], item: Item) -> Result<(), usize> {
		match keys {
			[] => Err(0),
			[key] => if self.push(key.clone(), item) { Ok(()) } else { Err(0) },
			[first, rest @ ..] => self.get_or_add_single_table(first)
				.map_err(|_| 0usize)?
				.push_multi_key(rest, item)
				.map_err(|idx| idx + 1),
		}
	}

	/// Get an element from the table
	pub fn get_item(&self, key: &str) -> Option<&Item> {
		self.mapping.get(key).map(|idx| &self.items[*idx])
	}

	/// Get an element of a specific type from the table
	pub fn get<T: FromTomlItem + ?Sized>(&self, key: &str) -> Option<&T> {
		self.get_item(key).and_then(T::from_item)
	}

	/// Get a mutable element from the table
	pub fn get_mut(&mut self, key: &str) -> Option<&mut Item> {
		self.mapping.get(key).map(|idx| &mut self.items[*idx])
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	fn get_or_add_table(&mut self, keys: &[String]) -> Result<&mut Table, ()> {
		match keys.split_first() {
			None => Ok(self),
			Some((first, rest)) => self.get_or_add_single_table(first)?.get_or_add_table(rest),
		}
	}

	fn get_or_add_single_table(&mut self, key: &String) -> Result<&mut Table, ()> {
		let idx = match self.mapping.get(key) {
			Some(idx) => *idx,
			None => {
				self.push(key.clone(), Item::Table(Table::new()));
				self.items.len() - 1
			}
		};

		match &mut self.items[idx] {
			Item::Table(table) => Ok(table),
			// Non table item, so we can't add this
			_ => Err(()),
		}
	}

	pub fn iter(&self) -> TableIter<'_> {
		TableIter { table: self, idx: 0 }
	}
}

pub struct TableIter<'a> {
	table: &'a Table,
	idx: usize,
}

impl<'a> Iterator for TableIter<'a> {
	type Item = (&'a str, &'a Item);

	fn next(&mut self) -> Option<Self::Item> {
		let key = self.table.keys.get(self.idx)?;
		let item = &self.table.items[self.idx];
		self.idx += 1;
		Some((key.as_str(), item))
	}
}

#[derive(Clone, Default, PartialEq, Debug)]
pub struct Toml {
	table : Table,
}

impl Toml {
	/// Create a new toml
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse toml from a string
	pub fn parse(source: &str) -> Result<Self, TomlParseError> {
		Parser::new(source).parse()
	}

	/// Get an element from the root table
	pub fn get(&self, key: &str) -> Option<&Item> {
		self.table.get_item(key)
	}

	/// Get a mutable element from the root table
	pub fn get_mut(&mut self, key: &str) -> Option<&mut Item> {
		self.table.get_mut(key)
	}

	/// Get the root table
	pub fn table(&self) -> &Table {
		&self.table
	}
}

struct Parser<'a> {
	parser : StrParser<'a>,
}

impl<'a> Parser<'a> {
	fn new(source: &'a str) -> Self {
		Self { parser: StrParser::new(source) }
	}

	fn parse(&mut self) -> Result<Toml, TomlParseError> {
		let mut toml = Toml::new();
		let mut table_keys: Vec<String> = Vec::new();

		self.skip_blank();
		while self.parser.can_parse() {
			if self.parser.starts_with("[[") {
				return Err(self.error("Array tables are not supported"));
			} else if self.parser.consume_char('[') {
				self.parser.consume_whitespace(false);
				table_keys = self.parse_keys()?;
				if !self.parser.consume_char(']') {
					return Err(self.error("Table is not closed"));
				}
				if toml.table.get_or_add_table(&table_keys).is_err() {
					return Err(self.error("Path does not point to a table"));
				}
			} else {
				let (keys, item) = self.parse_key_item()?;
				let table = toml.table.get_or_add_table(&table_keys)
					.map_err(|_| self.error("Path does not point to a table"))?;
				if table.push_multi_key(&keys, item).is_err() {
					return Err(self.error("Duplicate key"));
				}
			}

			self.end_of_line()?;
			self.skip_blank();
		}
		Ok(toml)
	}

	/// Skip whitespace, newlines and comments
	fn skip_blank(&mut self) {
		loop {
			self.parser.consume_whitespace(true);
			if self.parser.starts_with("#") {
				self.parser.consume_to_eol();
			} else {
				break;
			}
		}
	}

	/// Only whitespace or a comment may follow an expression on the same line
	fn end_of_line(&mut self) -> Result<(), TomlParseError> {
		self.parser.consume_whitespace(false);
		match self.parser.peek() {
			None | Some('\n') | Some('#') => Ok(()),
			Some(_) => Err(self.error("Expected the end of the line")),
		}
	}

	fn parse_key_item(&mut self) -> Result<(Vec<String>, Item), TomlParseError> {
		let keys = self.parse_keys()?;
		if !self.parser.consume_char('=') {
			return Err(self.error("Key is not followed by an `=`"));
		}
		self.parser.consume_whitespace(false);
		let item = self.parse_item()?;
		Ok((keys, item))
	}

	fn parse_keys(&mut self) -> Result<Vec<String>, TomlParseError> {
		let mut arr = Vec::new();
		loop {
			let key = if self.parser.starts_with("\"") {
				match self.parser.extract_string("\"", "\"", false) {
					Some(s) => unescape(s).ok_or_else(|| self.error("Invalid escape sequence in key"))?,
					None => return Err(self.error("Invalid key")),
				}
			} else {
				let key = self.parser.extract_until(|ch: char| !ch.is_alphanumeric() && ch != '-' && ch != '_');
				if key.is_empty() {
					return Err(self.error("Expected a key"));
				}
				key.to_string()
			};
			arr.push(key);

			self.parser.consume_whitespace(false);
			if !self.parser.consume_char('.') {
				return Ok(arr);
			}
			self.parser.consume_whitespace(false);
		}
	}

	fn parse_item(&mut self) -> Result<Item, TomlParseError> {
		let Some(first) = self.parser.peek() else {
			return Err(self.error("End of file"));
		};

		if self.consume_keyword("true") {
			return Ok(Item::Boolean(true));
		} else if self.consume_keyword("false") {
			return Ok(Item::Boolean(false));
		}

		match first {
			// TOML basic strings
			'"' => {
				let (delim, multi_line) = if self.parser.starts_with("\"\"\"") { ("\"\"\"", true) } else { ("\"", false) };
				match self.parser.extract_string(delim, delim, multi_line) {
					Some(string) => unescape(string)
						.map(Item::String)
						.ok_or_else(|| self.error("Invalid escape sequence")),
					None => Err(self.error("Invalid string")),
				}
			},
			// TOML literal strings
			'\'' => {
				let (delim, multi_line) = if self.parser.starts_with("'''") { ("'''", true) } else { ("'", false) };
				match self.parser.extract_string(delim, delim, multi_line) {
					Some(string) => Ok(Item::String(string.to_string())),
					None => Err(self.error("Invalid string")),
				}
			},
			'[' => self.parse_array(),
			'{' => self.parse_inline_table(),
			ch if ch.is_ascii_digit() || ch == '-' || ch == '+' => self.parse_number(),
			_ => Err(self.error("Invalid item")),
		}
	}

	fn consume_keyword(&mut self, keyword: &str) -> bool {
		let follows_word = self.parser.string[keyword.len().min(self.parser.string.len())..]
			.chars()
			.next()
			.map_or(false, |ch| ch.is_alphanumeric() || ch == '_');
		self.parser.starts_with(keyword) && !follows_word && self.parser.consume_str(keyword)
	}

	fn parse_number(&mut self) -> Result<Item, TomlParseError> {
		let s = self.parser.extract_until(|ch: char| !ch.is_alphanumeric() && ch != '-' && ch != '+' && ch != '_' && ch != '.');
		let mut s = s.to_string();
		s.retain(|ch| ch != '_');

		let (negative, digits) = match s.strip_prefix('-') {
			Some(digits) => (true, digits),
			None => (false, s.strip_prefix('+').unwrap_or(&s)),
		};
		let sign = if negative { -1 } else { 1 };

		let radix_val = |prefix: &str, radix: u32| digits.strip_prefix(prefix).map(|digits| i64::from_str_radix(digits, radix));
		if let Some(val) = radix_val("0x", 16) {
			val.map(|val| Item::Integer(sign * val)).map_err(|_| self.error("Invalid hexadecimal literal"))
		} else if let Some(val) = radix_val("0o", 8) {
			val.map(|val| Item::Integer(sign * val)).map_err(|_| self.error("Invalid octal literal"))
		} else if let Some(val) = radix_val("0b", 2) {
			val.map(|val| Item::Integer(sign * val)).map_err(|_| self.error("Invalid binary literal"))
		} else if digits == "inf" {
			Ok(Item::Float(sign as f64 * f64::INFINITY))
		} else if digits == "nan" {
			Ok(Item::Float(f64::NAN))
		} else if s.contains(['.', 'e', 'E']) {
			s.parse::<f64>().map(Item::Float).map_err(|_| self.error("Invalid float literal"))
		} else {
			s.parse::<i64>().map(Item::Integer).map_err(|_| self.error("Invalid integer literal"))
		}
	}

	fn parse_array(&mut self) -> Result<Item, TomlParseError> {
		let valid = self.parser.consume_char('[');
		debug_assert!(valid);

		let mut arr = Vec::new();
		loop {
			self.skip_blank();
			if self.parser.consume_char(']') {
				return Ok(Item::Array(arr));
			}

			arr.push(self.parse_item()?);
			self.skip_blank();
			if !self.parser.consume_char(',') {
				self.skip_blank();
				return if self.parser.consume_char(']') {
					Ok(Item::Array(arr))
				} else {
					Err(self.error("Array was not ended correctly"))
				};
			}
		}
	}

	fn parse_inline_table(&mut self) -> Result<Item, TomlParseError> {
		let valid = self.parser.consume_char('{');
		debug_assert!(valid);

		self.parser.consume_whitespace(false);
		let mut table = Table::new();
		if self.parser.consume_char('}') {
			return Ok(Item::Table(table));
		}

		loop {
			let (keys, item) = self.parse_key_item()?;
			table.push_multi_key(&keys, item).map_err(|_| self.error("Duplicate key"))?;
			self.parser.consume_whitespace(false);
			if !self.parser.consume_char(',') {
				break;
			}
			self.parser.consume_whitespace(false);
		}

		if self.parser.consume_char('}') {
			Ok(Item::Table(table))
		} else {
			Err(self.error("Inline table was not ended correctly"))
		}
	}

	fn error(&self, msg: &'static str) -> TomlParseError {
		TomlParseError(self.parser.error(msg))
	}
}

/// Resolve the escape sequences of a basic string
fn unescape(s: &str) -> Option<String> {
	let mut res = String::with_capacity(s.len());
	let mut chars = s.chars();
	while let Some(ch) = chars.next() {
		if ch != '\\' {
			res.push(ch);
			continue;
		}

		match chars.next()? {
			'"'  => res.push('"'),
			'\\' => res.push('\\'),
			'n'  => res.push('\n'),
			't'  => res.push('\t'),
			'r'  => res.push('\r'),
			'b'  => res.push('\u{8}'),
			'f'  => res.push('\u{C}'),
			'u'  => {
				let hex: String = chars.by_ref().take(4).collect();
				res.push(u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)?);
			},
			'U'  => {
				let hex: String = chars.by_ref().take(8).collect();
				res.push(u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)?);
			},
			_ => return None,
		}
	}
	Some(res)
}

pub trait FromTomlItem {
	fn from_item(item: &Item) -> Option<&Self>;
}

impl FromTomlItem for Item {
	fn from_item(item: &Item) -> Option<&Self> {
		Some(item)
	}
}

impl FromTomlItem for str {
	fn from_item(item: &Item) -> Option<&Self> {
		match item {
			Item::String(s) => Some(s.as_str()),
			_ => None,
		}
	}
}

macro_rules! impl_from_toml_item {
	($ty:ty => $iden:ident) => {
		impl FromTomlItem for $ty {
			fn from_item(item: &Item) -> Option<&Self> {
				if let Item::$iden(s) = item {
					Some(s)
				} else {
					None
				}
			}
		}
	};
}
impl_from_toml_item!(String => String);
impl_from_toml_item!(i64 => Integer);
impl_from_toml_item!(f64 => Float);
impl_from_toml_item!(bool => Boolean);
impl_from_toml_item!(Vec<Item> => Array);
impl_from_toml_item!(Table => Table);
