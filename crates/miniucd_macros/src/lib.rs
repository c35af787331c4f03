//! Derive macros for the small enums used throughout miniucd (property types, entry kinds, log levels).
//!
//! The generated impls refer to traits in `miniucd_base`, so any crate using these derives needs it as a dependency.

use proc_macro::TokenStream;

mod derive;

/// Implement `miniucd_base::EnumCountT` for a fieldless enum.
#[proc_macro_derive(EnumCount)]
pub fn derive_enum_count(item: TokenStream) -> TokenStream {
	derive::enum_count(item.into()).into()
}

/// Implement `miniucd_base::EnumFromNameT` for a fieldless enum.
///
/// Each variant is matched by its identifier, or by every `#[parse_name("...")]` attribute placed on it.
#[proc_macro_derive(EnumFromName, attributes(parse_name))]
pub fn derive_enum_from_name(item: TokenStream) -> TokenStream {
	derive::enum_from_name(item.into()).into()
}

/// Implement `core::fmt::Display` for a fieldless enum, using `#[display("...")]` or the variant identifier.
#[proc_macro_derive(EnumDisplay, attributes(display))]
pub fn derive_enum_display(item: TokenStream) -> TokenStream {
	derive::enum_display(item.into()).into()
}
