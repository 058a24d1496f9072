//! Procedural macros for the `test_temp_core` crate.
//!
//! This crate provides the `#[temp_test]` attribute macro, which binds marked
//! test parameters to per-test temporary resources, and the
//! `#[derive(TestClass)]` macro for class-level configuration markers.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use test_temp_core::{TempPath, TestClass, temp_test};
//!
//! #[derive(TestClass)]
//! #[temp(input_files(extension = "txt"))]
//! struct ParserTests;
//!
//! #[temp_test(class = ParserTests)]
//! fn parses(#[temp_input_file] source: PathBuf, #[temp_output_directory] out: TempPath) {
//!     // source = <root>/<invocation>/input/0/input_1.txt
//!     // out    = <root>/<invocation>/output/directory_1
//! }
//! ```

mod crate_path;
mod test_class;

use proc_macro::TokenStream;

/// Turns a function with marked parameters into a test that receives
/// temporary resources.
///
/// Every parameter must carry exactly one marker:
///
/// | Marker                      | Allocates                              |
/// |-----------------------------|----------------------------------------|
/// | `#[temp_file]`              | `file_<n>.<ext>`                       |
/// | `#[temp_input_file]`        | `input/0/input_<n>.<ext>`              |
/// | `#[temp_input_directory]`   | `input/directory_<n>`                  |
/// | `#[temp_output_file]`       | `output/0/output_<n>.<ext>`            |
/// | `#[temp_output_directory]`  | `output/directory_<n>`                 |
///
/// Parameter types must be `TempPath`, `PathBuf` or `String`. The optional
/// `class = Type` argument names a `TestClass` whose markers configure
/// extensions and eager directory creation.
///
/// # Generated Code
///
/// ```ignore
/// #[temp_test(class = ParserTests)]
/// fn parses(#[temp_input_file] source: PathBuf) { /* body */ }
/// ```
///
/// expands to roughly:
///
/// ```ignore
/// #[test]
/// fn parses() {
///     let scope = TestScope::begin::<ParserTests>(concat!(module_path!(), "::", "parses"));
///     let source: PathBuf = match scope.provide_as::<PathBuf>("source", Marker::TempInputFile) {
///         Ok(value) => value,
///         Err(err) => panic!(...),
///     };
///     /* body */
/// } // scope dropped: the invocation tree is deleted
/// ```
#[proc_macro_attribute]
pub fn temp_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    temp_test::temp_test(attr, item)
}

/// Derives `TestClass` from `#[temp(...)]` markers.
///
/// # Attributes
///
/// - `input_files(extension = "txt")` / `output_files(...)`: file name
///   extension for input/output files. Defaults to `"tmp"`.
/// - `input_directories(create = true)` / `output_directories(...)`:
///   create allocated directories before the test runs.
///
/// ```ignore
/// #[derive(TestClass)]
/// #[temp(output_files(extension = "json"), output_directories(create = true))]
/// struct ExportTests;
/// ```
#[proc_macro_derive(TestClass, attributes(temp))]
pub fn derive_test_class(input: TokenStream) -> TokenStream {
    test_class::derive_test_class(input)
}
