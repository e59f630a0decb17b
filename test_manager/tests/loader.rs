use test_manager::error::ManagerError;
use test_manager::loader::load_tests;
use util::test_case::ExpectedOutput;
use util::test_helpers::write_file;

const TESTS_JSON: &str = r#"[
  { "name": "basic", "cmds": "1p", "input": "in/basic.txt", "output": "out/basic.txt" },
  { "name": "delim", "cmds": "irow 2", "delim": ":", "input": "/abs/in.txt", "output": "ERROR" }
]"#;

#[test]
fn test_loads_cases_relative_to_list() {
    let dir = tempfile::tempdir().unwrap();
    let list = write_file(dir.path(), "tests.json", TESTS_JSON).unwrap();

    let cases = load_tests(&list, true, false).unwrap();

    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0].name, "basic");
    assert_eq!(cases[0].arguments, vec!["1p"]);
    assert_eq!(cases[0].input, dir.path().join("in/basic.txt"));
    assert_eq!(
        cases[0].expected_output,
        ExpectedOutput::File(dir.path().join("out/basic.txt"))
    );
    assert!(cases[0].memory_check);

    assert_eq!(cases[1].arguments, vec!["-d", ":", "irow 2"]);
    assert_eq!(cases[1].input.to_str(), Some("/abs/in.txt"));
    assert!(cases[1].expected_output.is_error());
}

#[test]
fn test_missing_list_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_tests(dir.path().join("nope.json"), false, false).unwrap_err();
    assert!(matches!(err, ManagerError::ReadTests { .. }));
}

#[test]
fn test_malformed_list_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let list = write_file(dir.path(), "tests.json", r#"[{ "name": "x" }]"#).unwrap();
    let err = load_tests(&list, false, false).unwrap_err();
    assert!(matches!(err, ManagerError::ParseTests { .. }));
}

#[test]
fn test_empty_list_is_valid() {
    let dir = tempfile::tempdir().unwrap();
    let list = write_file(dir.path(), "tests.json", "[]").unwrap();
    assert!(load_tests(&list, false, false).unwrap().is_empty());
}
