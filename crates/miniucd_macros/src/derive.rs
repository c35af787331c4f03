use proc_macro2::*;
use quote::quote;
use syn::*;

/// Parse the input and make sure it is an enum with only unit variants
fn parse_unit_enum(item: TokenStream) -> core::result::Result<(Ident, Vec<Variant>), TokenStream> {
	let input_parsed = match syn::parse2::<DeriveInput>(item) {
		Ok(derived_input) => derived_input,
		Err(err) => return Err(err.to_compile_error()),
	};

	let body_data = match input_parsed.data {
		Data::Enum(body) => body,
		_ => return Err(quote!( compile_error!("Not an enum"); )),
	};

	let mut variants = Vec::with_capacity(body_data.variants.len());
	for variant in body_data.variants {
		if !matches!(variant.fields, Fields::Unit) {
			let msg = format!("Variant '{}' has fields, only fieldless enums are supported", variant.ident);
			return Err(quote!( compile_error!(#msg); ));
		}
		variants.push(variant);
	}
	Ok((input_parsed.ident, variants))
}

/// Collect the string arguments of every attribute with the given name
fn attr_strings(variant: &Variant, name: &str) -> core::result::Result<Vec<String>, TokenStream> {
	let mut vals = Vec::new();
	for attr in variant.attrs.iter().filter(|attr| attr.path().is_ident(name)) {
		match attr.parse_args::<LitStr>() {
			Ok(parsed) => vals.push(parsed.value()),
			Err(err) => return Err(err.to_compile_error()),
		}
	}
	Ok(vals)
}

pub fn enum_count(item: TokenStream) -> TokenStream {
	let (ident, variants) = match parse_unit_enum(item) {
		Ok(parsed) => parsed,
		Err(err) => return err,
	};
	let count = variants.len();

	quote!{
		impl miniucd_base::EnumCountT for #ident {
			const COUNT: usize = #count;
		}
	}
}

pub fn enum_display(item: TokenStream) -> TokenStream {
	let (ident, variants) = match parse_unit_enum(item) {
		Ok(parsed) => parsed,
		Err(err) => return err,
	};

	let mut members = Vec::with_capacity(variants.len());
	let mut names = Vec::with_capacity(variants.len());
	for variant in &variants {
		let name = match attr_strings(variant, "display") {
			Ok(vals) => vals.into_iter().next().unwrap_or_else(|| variant.ident.to_string()),
			Err(err) => return err,
		};
		members.push(variant.ident.clone());
		names.push(name);
	}

	quote!{
		impl core::fmt::Display for #ident {
			fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
				match self {
					#(#ident::#members => f.write_str(#names),)*
				}
			}
		}
	}
}

pub fn enum_from_name(item: TokenStream) -> TokenStream {
	let (ident, variants) = match parse_unit_enum(item) {
		Ok(parsed) => parsed,
		Err(err) => return err,
	};

	// A variant can be reached through several names, so arms are flattened into (name, member) pairs
	let mut members = Vec::with_capacity(variants.len());
	let mut names = Vec::with_capacity(variants.len());
	for variant in &variants {
		let mut parse_names = match attr_strings(variant, "parse_name") {
			Ok(vals) => vals,
			Err(err) => return err,
		};
		if parse_names.is_empty() {
			parse_names.push(variant.ident.to_string());
		}

		for name in parse_names {
			if names.contains(&name) {
				let msg = format!("Name '{name}' is used by more than one variant");
				return quote!( compile_error!(#msg); );
			}
			members.push(variant.ident.clone());
			names.push(name);
		}
	}

	quote!{
		impl miniucd_base::EnumFromNameT for #ident {
			fn parse(s: &str) -> Option<Self> {
				match s {
					#(#names => Some(Self::#members),)*
					_ => None,
				}
			}
		}
	}
}
