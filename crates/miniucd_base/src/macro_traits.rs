//! Contains traits used by miniucd macros


/// Trait to get the number of variants in an enum
pub trait EnumCountT {
    /// Number of variants in the enum
    const COUNT : usize;
}

/// Trait to get an enum variant from its textual name, as it appears in the UCD or in settings files
pub trait EnumFromNameT: Sized {
    /// Try to parse the enum from a string slice.
    fn parse(s: &str) -> Option<Self>;

    /// Try to parse the enum from a string slice, returning `default` when the name is unknown.
    fn parse_or(s: &str, default: Self) -> Self {
        Self::parse(s).unwrap_or(default)
    }
}
