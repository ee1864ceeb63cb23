use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tempfile::TempDir;

use stepdag::cli::CliArgs;
use stepdag::errors::{ErrorKind, StepdagError};
use stepdag::fs::mock::MockFileSystem;
use stepdag::fs::{FileSystem, RealFileSystem};
use stepdag::output::format_ordering;
use stepdag::run_with_fs;
use stepdag_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

const BASIC_JOB: &str = r#"
- step: "create user 1"
  dependencies: ["prepare database"]
  precedence: 100
- step: "prepare database"
  precedence: 10
"#;

fn args(argv: &[&str]) -> CliArgs {
    let mut full = vec!["stepdag"];
    full.extend_from_slice(argv);
    CliArgs::parse_from(full)
}

#[test]
fn ordering_lines_are_all_newline_terminated() {
    assert_eq!(format_ordering(&["a", "b c"]), "a\nb c\n");
    assert_eq!(format_ordering(&["only"]), "only\n");
    assert_eq!(format_ordering::<&str>(&[]), "");
}

#[test]
fn writes_ordering_to_output_file() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("job.yaml", BASIC_JOB);

    let mut stdout = Vec::new();
    run_with_fs(&args(&["job.yaml", "out/order.txt"]), &fs, &mut stdout)?;

    assert_eq!(
        fs.contents("out/order.txt").as_deref(),
        Some("prepare database\ncreate user 1\n")
    );
    assert!(stdout.is_empty());
    Ok(())
}

#[test]
fn prints_ordering_when_no_output_is_given() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("job.yaml", BASIC_JOB);

    let mut stdout = Vec::new();
    run_with_fs(&args(&["job.yaml"]), &fs, &mut stdout)?;

    assert_eq!(String::from_utf8(stdout)?, "prepare database\ncreate user 1\n");
    Ok(())
}

#[test]
fn dry_run_prints_summary_and_writes_nothing() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("job.yaml", BASIC_JOB);

    let mut stdout = Vec::new();
    run_with_fs(&args(&["--dry-run", "job.yaml", "order.txt"]), &fs, &mut stdout)?;

    let printed = String::from_utf8(stdout)?;
    assert!(printed.contains("steps (2):"));
    assert!(printed.contains("precedence: 100"));
    assert!(printed.contains("ordering (2):"));
    assert!(printed.contains("1. prepare database"));
    assert!(!fs.exists(&PathBuf::from("order.txt")));
    Ok(())
}

#[test]
fn format_flag_overrides_extension() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(
        "job.txt",
        "[[step]]\nname = \"b\"\nprecedence = 1\n\n[[step]]\nname = \"a\"\nprecedence = 1\n",
    );

    let mut stdout = Vec::new();
    run_with_fs(&args(&["--format", "toml", "job.txt"]), &fs, &mut stdout)?;

    assert_eq!(String::from_utf8(stdout)?, "a\nb\n");
    Ok(())
}

#[test]
fn engine_errors_leave_output_untouched() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(
        "job.yaml",
        "- step: a\n  dependencies: [b]\n  precedence: 1\n- step: b\n  dependencies: [a]\n  precedence: 1\n",
    );

    let mut stdout = Vec::new();
    let err = run_with_fs(&args(&["job.yaml", "order.txt"]), &fs, &mut stdout).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CyclicDependency);
    assert!(!fs.exists(&PathBuf::from("order.txt")));
    assert!(stdout.is_empty());

    let mut stdout = Vec::new();
    let err = run_with_fs(&args(&["job.yaml", "--dry-run"]), &fs, &mut stdout).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CyclicDependency);
    assert!(stdout.is_empty());
}

#[test]
fn missing_input_file_is_reported() {
    init_tracing();
    let fs = MockFileSystem::new();

    let mut stdout = Vec::new();
    match run_with_fs(&args(&["nope.yaml"]), &fs, &mut stdout) {
        Err(StepdagError::Other(e)) => assert!(e.to_string().contains("nope.yaml")),
        other => panic!("expected Other, got {other:?}"),
    }
}

#[test]
fn real_filesystem_round_trip() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let input = dir.path().join("job.yaml");
    let output = dir.path().join("nested").join("order.txt");
    fs::write(&input, BASIC_JOB)?;

    let argv = [
        input.to_string_lossy().into_owned(),
        output.to_string_lossy().into_owned(),
    ];
    let argv: Vec<&str> = argv.iter().map(String::as_str).collect();

    let mut stdout = Vec::new();
    run_with_fs(&args(&argv), &RealFileSystem, &mut stdout)?;

    assert!(RealFileSystem.exists(&output));
    assert_eq!(fs::read_to_string(&output)?, "prepare database\ncreate user 1\n");
    Ok(())
}

#[test]
fn explain_does_not_change_the_ordering() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("job.yaml", BASIC_JOB);

    let mut plain = Vec::new();
    run_with_fs(&args(&["job.yaml"]), &fs, &mut plain)?;
    let mut explained = Vec::new();
    run_with_fs(&args(&["--explain", "job.yaml"]), &fs, &mut explained)?;

    assert_eq!(plain, explained);
    Ok(())
}
