use core::fmt;
use miniucd_macros::{EnumDisplay, EnumFromName};
use serde::{Deserialize, Serialize};

/// How the values of a property are stored
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumFromName, EnumDisplay, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
	/// Numeric value, kept as text (e.g. `1/2`)
	#[parse_name("numeric")]
	#[display("numeric")]
	Numeric,
	/// Free-form string
	#[parse_name("string")]
	#[display("string")]
	String,
	/// Single related codepoint, stored as a delta
	#[parse_name("cp")]
	#[display("cp")]
	Cp,
	/// One or more related codepoints
	#[parse_name("mcp")]
	#[display("mcp")]
	Mcp,
	/// Space separated list of values of another enumerated property
	#[parse_name("enumList")]
	#[display("enumList")]
	EnumList,
	#[parse_name("enum")]
	#[display("enum")]
	Enum,
	#[parse_name("boolean")]
	#[display("boolean")]
	Boolean,
	/// Character names, never compiled into tables
	#[parse_name("name")]
	#[display("name")]
	Name,
	/// Deprecated property, never compiled into tables
	#[parse_name("deprecated")]
	#[display("deprecated")]
	Deprecated,
}

impl PropertyType {
	/// Whether values of this type end up in the change point data
	pub const fn is_compiled(self) -> bool {
		!matches!(self, PropertyType::Name | PropertyType::Deprecated)
	}
}

/// Static description of a UCD property
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PropertyDescriptor {
	/// Short property name, as used in the XML attributes
	pub name     : &'static str,
	pub ty       : PropertyType,
	/// Enumerated property whose values this property lists
	pub enum_ref : Option<&'static str>,
}

impl fmt::Display for PropertyDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.name, self.ty)
	}
}

const fn prop(name: &'static str, ty: PropertyType) -> PropertyDescriptor {
	PropertyDescriptor { name, ty, enum_ref: None }
}

use PropertyType::{Numeric, Cp, Mcp, EnumList, Enum, Boolean, Name, Deprecated};

/// UAX #44 properties known to miniucd.
///
/// Unihan (UAX #38) and Egyptian hieroglyph (UAX #57) properties are not included.
pub static PROPERTIES: &[PropertyDescriptor] = &[
	//==============================================================
	// Numeric properties
	prop("nv", Numeric),

	//==============================================================
	// String properties
	prop("bmg", Cp),
	prop("bpb", Cp),
	prop("cf", Mcp),
	prop("dm", Mcp),
	prop("EqUIdeo", Cp),
	prop("FC_NFKC", Deprecated),
	prop("lc", Mcp),
	prop("NFKC_CF", Mcp),
	prop("NFKC_SCF", Mcp),
	prop("scf", Cp),
	prop("slc", Cp),
	prop("stc", Cp),
	prop("suc", Cp),
	prop("tc", Mcp),
	prop("uc", Mcp),

	//==============================================================
	// Miscellaneous properties
	prop("isc", Deprecated),
	prop("JSN", Name),
	prop("na", Name),
	prop("na1", Name),
	prop("Name_Alias", Name),
	PropertyDescriptor { name: "scx", ty: EnumList, enum_ref: Some("sc") },

	//==============================================================
	// Catalog properties
	prop("age", Enum),
	prop("blk", Enum),
	prop("sc", Enum),

	//==============================================================
	// Enumerated properties
	prop("bc", Enum),
	prop("bpt", Enum),
	prop("ccc", Enum),
	prop("dt", Enum),
	prop("ea", Enum),
	prop("gc", Enum),
	prop("GCB", Enum),
	prop("hst", Enum),
	prop("InCB", Enum),
	prop("InPC", Enum),
	prop("InSC", Enum),
	prop("jg", Enum),
	prop("jt", Enum),
	prop("lb", Enum),
	prop("NFC_QC", Enum),
	prop("NFD_QC", Enum),
	prop("NFKC_QC", Enum),
	prop("NFKD_QC", Enum),
	prop("nt", Enum),
	prop("SB", Enum),
	prop("vo", Enum),
	prop("WB", Enum),

	//==============================================================
	// Binary properties
	prop("AHex", Boolean),
	prop("Alpha", Boolean),
	prop("Bidi_C", Boolean),
	prop("Bidi_M", Boolean),
	prop("Cased", Boolean),
	prop("CE", Boolean),
	prop("CI", Boolean),
	prop("Comp_Ex", Boolean),
	prop("CWCF", Boolean),
	prop("CWCM", Boolean),
	prop("CWKCF", Boolean),
	prop("CWL", Boolean),
	prop("CWT", Boolean),
	prop("CWU", Boolean),
	prop("Dash", Boolean),
	prop("Dep", Boolean),
	prop("DI", Boolean),
	prop("Dia", Boolean),
	prop("EBase", Boolean),
	prop("EComp", Boolean),
	prop("EMod", Boolean),
	prop("Emoji", Boolean),
	prop("EPres", Boolean),
	prop("Ext", Boolean),
	prop("ExtPict", Boolean),
	prop("Gr_Base", Boolean),
	prop("Gr_Ext", Boolean),
	prop("Gr_Link", Deprecated),
	prop("Hex", Boolean),
	prop("Hyphen", Deprecated),
	prop("ID_Compat_Math_Continue", Boolean),
	prop("ID_Compat_Math_Start", Boolean),
	prop("IDC", Boolean),
	prop("Ideo", Boolean),
	prop("IDS", Boolean),
	prop("IDSB", Boolean),
	prop("IDST", Boolean),
	prop("IDSU", Boolean),
	prop("Join_C", Boolean),
	prop("LOE", Boolean),
	prop("Lower", Boolean),
	prop("Math", Boolean),
	prop("MCM", Boolean),
	prop("NChar", Boolean),
	prop("OAlpha", Boolean),
	prop("ODI", Boolean),
	prop("OGr_Ext", Boolean),
	prop("OIDC", Boolean),
	prop("OIDS", Boolean),
	prop("OLower", Boolean),
	prop("OMath", Boolean),
	prop("OUpper", Boolean),
	prop("Pat_Syn", Boolean),
	prop("Pat_WS", Boolean),
	prop("PCM", Boolean),
	prop("QMark", Boolean),
	prop("Radical", Boolean),
	prop("RI", Boolean),
	prop("SD", Boolean),
	prop("STerm", Boolean),
	prop("Term", Boolean),
	prop("UIdeo", Boolean),
	prop("Upper", Boolean),
	prop("VS", Boolean),
	prop("WSpace", Boolean),
	prop("XIDC", Boolean),
	prop("XIDS", Boolean),
	prop("XO_NFC", Deprecated),
	prop("XO_NFD", Deprecated),
	prop("XO_NFKC", Deprecated),
	prop("XO_NFKD", Deprecated),
];

/// Find a property by its short name
pub fn find_property(name: &str) -> Option<&'static PropertyDescriptor> {
	PROPERTIES.iter().find(|desc| desc.name == name)
}
