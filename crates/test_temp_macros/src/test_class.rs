//! Derive macro for the `TestClass` trait.

use crate::crate_path;
use darling::{FromDeriveInput, FromMeta};
use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// Parsed `#[temp(...)]` attributes.
#[derive(FromDeriveInput)]
#[darling(attributes(temp))]
struct TestClassArgs {
    ident: syn::Ident,
    generics: syn::Generics,

    /// Marker for `#[temp_input_file]` resources.
    #[darling(default)]
    input_files: Option<FilesArgs>,

    /// Marker for `#[temp_output_file]` resources.
    #[darling(default)]
    output_files: Option<FilesArgs>,

    /// Marker for `#[temp_input_directory]` resources.
    #[darling(default)]
    input_directories: Option<DirectoriesArgs>,

    /// Marker for `#[temp_output_directory]` resources.
    #[darling(default)]
    output_directories: Option<DirectoriesArgs>,
}

/// `input_files(...)` / `output_files(...)`.
#[derive(FromMeta)]
struct FilesArgs {
    /// File name extension without the dot. Defaults to `"tmp"`.
    #[darling(default = "default_extension")]
    extension: String,
}

/// `input_directories(...)` / `output_directories(...)`.
#[derive(FromMeta)]
struct DirectoriesArgs {
    /// Create allocated directories immediately. Defaults to `false`.
    #[darling(default)]
    create: bool,
}

/// Returns the default file name extension.
fn default_extension() -> String {
    "tmp".to_string()
}

/// Rejects extensions that would escape the file name.
fn validate_extension(ident: &syn::Ident, files: Option<&FilesArgs>) -> syn::Result<()> {
    match files {
        Some(files) if files.extension.contains(['/', '\\']) || files.extension.starts_with('.') => {
            Err(syn::Error::new_spanned(
                ident,
                format!(
                    "invalid extension `{}`: expected a bare extension such as \"txt\"",
                    files.extension
                ),
            ))
        }
        _ => Ok(()),
    }
}

/// Implementation of the `#[derive(TestClass)]` macro.
///
/// # Example
///
/// ```ignore
/// #[derive(TestClass)]
/// #[temp(input_files(extension = "txt"), input_directories(create = true))]
/// struct ParserTests;
/// ```
pub(crate) fn derive_test_class(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let args = match TestClassArgs::from_derive_input(&input) {
        Ok(args) => args,
        Err(err) => return err.write_errors().into(),
    };

    for files in [args.input_files.as_ref(), args.output_files.as_ref()] {
        if let Err(err) = validate_extension(&args.ident, files) {
            return err.to_compile_error().into();
        }
    }

    let name = &args.ident;
    let (impl_generics, ty_generics, where_clause) = args.generics.split_for_impl();

    let input_files = args.input_files.as_ref().map(|files| {
        let extension = &files.extension;
        quote!(.with_input_files(#extension))
    });
    let output_files = args.output_files.as_ref().map(|files| {
        let extension = &files.extension;
        quote!(.with_output_files(#extension))
    });
    let input_directories = args.input_directories.as_ref().map(|dirs| {
        let create = dirs.create;
        quote!(.with_input_directories(#create))
    });
    let output_directories = args.output_directories.as_ref().map(|dirs| {
        let create = dirs.create;
        quote!(.with_output_directories(#create))
    });

    let tt = crate_path::core_path();

    let expanded = quote! {
        impl #impl_generics #tt::TestClass for #name #ty_generics #where_clause {
            fn role_config() -> #tt::RoleConfig {
                #tt::RoleConfig::new()
                    #input_files
                    #output_files
                    #input_directories
                    #output_directories
            }
        }
    };

    expanded.into()
}
