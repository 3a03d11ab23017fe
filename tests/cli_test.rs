use clap::Parser;
use serde_json::json;
use std::ffi::OsString;
use std::path::PathBuf;
use strata::cli::Args;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("strata")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["./templates", "./output"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.template_root, PathBuf::from("./templates"));
    assert_eq!(parsed.output_dir, PathBuf::from("./output"));
    assert!(parsed.layers.is_empty());
    assert!(!parsed.typescript);
    assert!(!parsed.force);
    assert!(!parsed.verbose);
    assert_eq!(parsed.package_name, None);
}

#[test]
fn test_repeated_layers_keep_order() {
    let args = make_args(&["-l", "base", "--layer", "config/router", "-l", "code/router", "t", "o"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.layers, ["base", "config/router", "code/router"]);
}

#[test]
fn test_feature_context() {
    let args = make_args(&["-F", "router", "--feature", "pinia", "--ts", "t", "o"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.typescript);
    assert_eq!(
        parsed.feature_context(),
        json!({"router": true, "pinia": true, "typescript": true})
    );
}

#[test]
fn test_all_flags() {
    let args = make_args(&["--force", "--verbose", "--typescript", "--package-name", "app", "t", "o"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.force);
    assert!(parsed.verbose);
    assert!(parsed.typescript);
    assert_eq!(parsed.package_name.as_deref(), Some("app"));
}

#[test]
fn test_missing_args() {
    let args = make_args(&["./templates"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["./templates", "./output", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}
