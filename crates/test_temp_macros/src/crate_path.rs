//! Naming `test_temp_core` from generated code.
//!
//! Expansions refer to `TestScope`, `Marker` and friends by absolute path.
//! Which path works depends on the manifest of the crate being compiled:
//! the engine itself (which aliases itself with `extern crate self`), a
//! direct and possibly renamed dependency on the engine, or only the
//! `test_temp` umbrella.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

const CORE: &str = "test_temp_core";
const UMBRELLA: &str = "test_temp";

/// The identifier a manifest entry is reachable under, if any.
fn extern_name(package: &str) -> Option<Ident> {
    let name = match crate_name(package).ok()? {
        FoundCrate::Itself => package.to_string(),
        FoundCrate::Name(name) => name,
    };
    Some(Ident::new(&name, Span::call_site()))
}

/// Path prefix for `test_temp_core` items in the consuming crate.
///
/// Falls back to the bare crate name so a missing dependency surfaces as an
/// unresolved-path error at the use site.
pub(crate) fn core_path() -> TokenStream {
    if let Some(core) = extern_name(CORE) {
        return quote!(#core);
    }
    match extern_name(UMBRELLA) {
        Some(umbrella) => quote!(#umbrella::test_temp_core),
        None => {
            let core = Ident::new(CORE, Span::call_site());
            quote!(#core)
        }
    }
}
