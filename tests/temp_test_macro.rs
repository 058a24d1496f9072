//! Tests for the `#[temp_test]` attribute and `#[derive(TestClass)]`.
//!
//! These run on the process-wide manager, so every resource lives below
//! `<storage root>/<test path>/` and is gone once the test returns.

use std::fs;
use std::path::{Path, PathBuf};

use test_temp::prelude::*;
use test_temp::{InvocationId, TempFileManager};

#[derive(TestClass)]
#[temp(input_files(extension = "txt"))]
struct TextInputs;

#[derive(TestClass)]
#[temp(
    input_directories(create = true),
    output_directories(create = false),
    output_files(extension = "json")
)]
struct EagerInputs;

#[derive(TestClass)]
#[temp(input_files())]
struct BareInputFiles;

#[derive(TestClass)]
#[temp(input_files(extension = "csv"))]
struct ImportTests;

/// Root the global manager uses for a test in this file.
fn root_of(test: &str) -> PathBuf {
    let id = InvocationId::from_test_name(&format!("{}::{test}", module_path!()));
    TempFileManager::global()
        .settings()
        .storage_root()
        .join(id.as_str())
}

fn file_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .expect("utf-8 file name")
}

#[temp_test]
fn default_files_are_numbered(#[temp_file] first: PathBuf, #[temp_file] second: PathBuf) {
    assert_eq!(file_name(&first), "file_1.tmp");
    assert_eq!(file_name(&second), "file_2.tmp");
    assert_eq!(first.parent(), Some(root_of("default_files_are_numbered").as_path()));
    assert!(!first.exists());
}

#[temp_test(class = TextInputs)]
fn class_extension_applies_to_input_files(
    #[temp_input_file] input: PathBuf,
    #[temp_output_file] output: PathBuf,
) {
    assert!(input.ends_with("input/0/input_1.txt"));
    assert!(output.ends_with("output/0/output_1.tmp"));
}

#[temp_test(class = BareInputFiles)]
fn files_marker_without_extension_defaults_to_tmp(#[temp_input_file] input: PathBuf) {
    assert_eq!(file_name(&input), "input_1.tmp");
}

#[temp_test(class = EagerInputs)]
fn eager_creation_follows_the_class(
    #[temp_input_directory] input: TempPath,
    #[temp_output_directory] output: TempPath,
    #[temp_output_file] report: PathBuf,
) {
    assert!(input.is_dir());
    assert!(!output.exists());
    assert_eq!(output.parent().and_then(Path::file_name), Some("output".as_ref()));
    assert_eq!(file_name(&report), "output_1.json");
}

#[temp_test(class = ImportTests)]
fn imports_rows(#[temp_input_file] source: PathBuf, #[temp_output_directory] out: TempPath) {
    fs::write(&source, "a,b\n1,2\n").expect("write csv");
    assert_eq!(source.extension().and_then(|ext| ext.to_str()), Some("csv"));
    assert_eq!(fs::read_to_string(&source).expect("read csv").lines().count(), 2);
    assert!(!out.exists());
    assert!(source.starts_with(root_of("imports_rows")));
}

#[temp_test]
fn every_shape_binds(
    #[temp_output_file] handle: TempPath,
    #[temp_output_file] path: PathBuf,
    #[temp_output_file] string: String,
) {
    assert!(handle.ends_with("output_1.tmp"));
    assert!(path.ends_with("output_2.tmp"));
    assert!(string.ends_with("output_3.tmp"));
    assert_eq!(handle.parent(), path.parent());
    assert_eq!(Path::new(&string).parent(), path.parent());
}

#[temp_test]
fn handle_writes_are_visible(#[temp_input_file] input: TempPath) {
    fs::write(&input, "hello").expect("write");
    assert!(input.exists());
    assert_eq!(fs::read_to_string(input.path()).expect("read"), "hello");
}

#[temp_test]
fn invocation_root_exists_while_running(#[temp_input_directory] dir: TempPath) {
    let root = root_of("invocation_root_exists_while_running");
    assert!(root.join("input").is_dir());
    assert!(dir.starts_with(&root));
    dir.create_dir_all().expect("create");
    fs::write(dir.join("nested.txt"), "x").expect("write nested");
}

#[temp_test]
fn no_parameters_is_fine() {
    assert!(!root_of("no_parameters_is_fine").exists());
}

#[temp_test]
#[should_panic(expected = "body failed")]
fn panicking_test_still_tears_down(#[temp_output_directory] out: TempPath) {
    out.create_dir_all().expect("create");
    panic!("body failed");
}

#[temp_test]
#[test]
fn explicit_test_attribute_is_not_duplicated(#[temp_file] file: String) {
    assert!(file.ends_with("file_1.tmp"));
}

#[temp_test]
fn mutable_bindings_are_kept(#[temp_file] mut path: PathBuf) {
    path.set_extension("bak");
    assert_eq!(file_name(&path), "file_1.bak");
}

#[test]
fn derived_classes_report_their_config() {
    let config = EagerInputs::role_config();
    assert!(config.eager_create_for(Role::InputDirectory));
    assert!(!config.eager_create_for(Role::OutputDirectory));
    assert_eq!(config.extension_for(Role::Output), "json");
    assert_eq!(config.extension_for(Role::Input), "tmp");

    assert_eq!(TextInputs::role_config().extension_for(Role::Input), "txt");
    assert!(TextInputs::class_name().ends_with("TextInputs"));
    assert_eq!(BareInputFiles::role_config(), RoleConfig::new().with_input_files("tmp"));
}
