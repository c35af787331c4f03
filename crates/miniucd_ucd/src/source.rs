//! Reader for the grouped UCD XML (`ucd.all.grouped.xml`).

use std::collections::BTreeMap;
use miniucd_base::EnumFromNameT;
use miniucd_logging::{log_debug, log_verbose, LogCategory};
use miniucd_macros::{EnumDisplay, EnumFromName};
use quick_xml::{events::{BytesStart, Event}, Reader};
use crate::{UcdError, UcdResult, MAX_CODEPOINT};

const LOG_CAT : LogCategory = LogCategory::new("Flatten");

/// Property attributes of a group or entry, keyed by short property name
pub type Attributes = BTreeMap<String, String>;

/// Kind of repertoire entry
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumFromName, EnumDisplay)]
pub enum EntryKind {
	#[parse_name("char")]
	#[display("char")]
	Char,
	#[parse_name("reserved")]
	#[display("reserved")]
	Reserved,
	#[parse_name("noncharacter")]
	#[display("noncharacter")]
	Noncharacter,
	#[parse_name("surrogate")]
	#[display("surrogate")]
	Surrogate,
}

/// Single codepoint or closed range of the repertoire, with its own property overrides
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Entry {
	pub kind  : EntryKind,
	pub first : u32,
	pub last  : u32,
	pub attrs : Attributes,
}

/// Entries sharing a set of default property values
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Group {
	pub attrs   : Attributes,
	pub entries : Vec<Entry>,
}

/// The repertoire of the grouped UCD XML
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct UcdSource {
	/// Version from the `<description>` element, e.g. `16.0.0`
	pub version : Option<String>,
	pub groups  : Vec<Group>,
}

impl UcdSource {
	pub const FILE_NAME: &'static str = "ucd.all.grouped.xml";

	/// Parse the grouped UCD XML
	///
	/// Entries directly inside the `<repertoire>` are put in a group without attributes.
	/// Elements outside the repertoire, like blocks or named sequences, are ignored.
	pub fn parse(xml: &str) -> UcdResult<Self> {
		let mut reader = Reader::from_str(xml);
		reader.config_mut().trim_text(true);

		let mut builder = SourceBuilder::default();
		loop {
			match reader.read_event()? {
				Event::Start(elem) => match elem.local_name().as_ref() {
					b"description" => builder.in_description = true,
					b"repertoire" => builder.in_repertoire = true,
					b"group" if builder.in_repertoire => builder.open_group(read_attributes(&reader, &elem)?),
					_ if builder.in_repertoire => builder.push_entry(&reader, &elem)?,
					_ => (),
				},
				Event::Empty(elem) => match elem.local_name().as_ref() {
					b"group" if builder.in_repertoire => {
						builder.open_group(read_attributes(&reader, &elem)?);
						builder.close_group();
					},
					_ if builder.in_repertoire => builder.push_entry(&reader, &elem)?,
					_ => (),
				},
				Event::End(elem) => match elem.local_name().as_ref() {
					b"description" => builder.in_description = false,
					b"repertoire" => builder.in_repertoire = false,
					b"group" => builder.close_group(),
					_ => (),
				},
				Event::Text(text) if builder.in_description => {
					let text = text.unescape()?;
					builder.source.version = text.trim().strip_prefix("Unicode").map(|version| version.trim().to_string());
				},
				Event::Eof => break,
				_ => (),
			}
		}

		if builder.skipped != 0 {
			log_verbose!(LOG_CAT, "Skipped {} entries without a codepoint", builder.skipped);
		}
		Ok(builder.source)
	}
}

#[derive(Default)]
struct SourceBuilder {
	source         : UcdSource,
	/// Group whose end tag was not read yet
	group          : Option<Group>,
	/// Whether the last group in `source` collects entries outside of any group
	implicit_open  : bool,
	in_repertoire  : bool,
	in_description : bool,
	skipped        : usize,
}

impl SourceBuilder {
	fn open_group(&mut self, attrs: Attributes) {
		self.close_group();
		self.group = Some(Group { attrs, entries: Vec::new() });
		self.implicit_open = false;
	}

	fn close_group(&mut self) {
		if let Some(group) = self.group.take() {
			self.source.groups.push(group);
		}
	}

	fn push_entry(&mut self, reader: &Reader<&[u8]>, elem: &BytesStart) -> UcdResult<()> {
		let Some(kind) = core::str::from_utf8(elem.local_name().as_ref()).ok().and_then(EntryKind::parse) else {
			return Ok(());
		};

		let mut attrs = read_attributes(reader, elem)?;
		let (first, last) = if let Some(cp) = attrs.remove("cp") {
			let cp = parse_codepoint(&cp)?;
			(cp, cp)
		} else if let Some(first) = attrs.remove("first-cp") {
			let first = parse_codepoint(&first)?;
			let last = match attrs.remove("last-cp") {
				Some(last) => parse_codepoint(&last)?,
				None => first,
			};
			(first, last)
		} else {
			log_debug!(LOG_CAT, Self::push_entry, "Skipping <{kind}> without a codepoint");
			self.skipped += 1;
			return Ok(());
		};

		let entry = Entry { kind, first, last, attrs };
		if let Some(group) = &mut self.group {
			group.entries.push(entry);
		} else if let (true, Some(implicit)) = (self.implicit_open, self.source.groups.last_mut()) {
			implicit.entries.push(entry);
		} else {
			self.source.groups.push(Group { attrs: Attributes::new(), entries: vec![entry] });
			self.implicit_open = true;
		}
		Ok(())
	}
}

fn read_attributes(reader: &Reader<&[u8]>, elem: &BytesStart) -> UcdResult<Attributes> {
	let mut attrs = Attributes::new();
	for attr in elem.attributes() {
		let attr = attr.map_err(quick_xml::Error::from)?;
		let key = reader.decoder().decode(attr.key.as_ref()).map_err(quick_xml::Error::from)?;
		let value = attr.unescape_value()?;
		attrs.insert(key.into_owned(), value.into_owned());
	}
	Ok(attrs)
}

fn parse_codepoint(text: &str) -> UcdResult<u32> {
	match u32::from_str_radix(text, 16) {
		Ok(cp) if cp <= MAX_CODEPOINT => Ok(cp),
		_ => Err(UcdError::InvalidCodepoint { text: text.to_string() }),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const XML: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<ucd xmlns="http://www.unicode.org/ns/2003/ucd/1.0">
  <description>Unicode 16.0.0</description>
  <repertoire>
    <group gc="Lu" sc="Latn" scx="Latn">
      <char cp="0042" suc="#"/>
      <char cp="0041"><name-alias alias="first" type="figment"/></char>
    </group>
    <reserved first-cp="0378" last-cp="0379" gc="Cn"/>
    <noncharacter first-cp="FDD0" last-cp="FDEF"/>
    <group gc="Cs"/>
    <surrogate/>
  </repertoire>
  <blocks>
    <block first-cp="0000" last-cp="007F" name="Basic Latin"/>
  </blocks>
</ucd>
"##;

	#[test]
	fn reads_groups_and_entries() {
		let source = UcdSource::parse(XML).unwrap();
		assert_eq!(source.version.as_deref(), Some("16.0.0"));
		assert_eq!(source.groups.len(), 3);

		let latin = &source.groups[0];
		assert_eq!(latin.attrs.get("gc").map(String::as_str), Some("Lu"));
		assert_eq!(latin.entries.len(), 2);
		assert_eq!(latin.entries[0].first, 0x42);
		assert_eq!(latin.entries[0].attrs.get("suc").map(String::as_str), Some("#"));
		assert!(!latin.entries[0].attrs.contains_key("cp"));
		assert_eq!(latin.entries[1].kind, EntryKind::Char);

		// Entries outside of a group share one implicit group
		let implicit = &source.groups[1];
		assert!(implicit.attrs.is_empty());
		assert_eq!(implicit.entries.len(), 2);
		assert_eq!((implicit.entries[0].kind, implicit.entries[0].first, implicit.entries[0].last), (EntryKind::Reserved, 0x378, 0x379));
		assert_eq!((implicit.entries[1].kind, implicit.entries[1].first, implicit.entries[1].last), (EntryKind::Noncharacter, 0xFDD0, 0xFDEF));

		// The surrogate without a codepoint is skipped
		assert!(source.groups[2].entries.is_empty());
	}

	#[test]
	fn invalid_codepoint_is_an_error() {
		let err = UcdSource::parse(r#"<ucd><repertoire><char cp="00G1"/></repertoire></ucd>"#).unwrap_err();
		assert!(matches!(err, UcdError::InvalidCodepoint { ref text } if text == "00G1"));

		let err = UcdSource::parse(r#"<ucd><repertoire><reserved first-cp="10FFFE" last-cp="80000000"/></repertoire></ucd>"#).unwrap_err();
		assert!(matches!(err, UcdError::InvalidCodepoint { ref text } if text == "80000000"));
	}

	#[test]
	fn malformed_xml_is_an_error() {
		let err = UcdSource::parse(r#"<ucd><repertoire><char cp="0041"></group></repertoire></ucd>"#).unwrap_err();
		assert!(matches!(err, UcdError::Xml(_)));
	}
}
