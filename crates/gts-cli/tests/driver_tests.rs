//! Tests for the gts command line driver.

use clap::Parser;
use gts_cli::args::{CliArgs, Command};
use gts_cli::driver;
use gts_core::PartialTranspileOptions;
use std::fs;
use std::path::PathBuf;

#[test]
fn build_arguments_parse() {
    let args = CliArgs::try_parse_from([
        "gts",
        "build",
        "a.gts",
        "b.gts",
        "--out-dir",
        "dist",
        "--source-map",
        "--runtime-import-source",
        "rt",
    ])
    .expect("valid arguments");
    match &args.command {
        Command::Build {
            files,
            out_dir,
            source_map,
        } => {
            assert_eq!(files, &vec![PathBuf::from("a.gts"), PathBuf::from("b.gts")]);
            assert_eq!(out_dir.as_deref(), Some(std::path::Path::new("dist")));
            assert!(*source_map);
        }
        other => panic!("unexpected command {other:?}"),
    }
    let inline = args.inline_options();
    assert_eq!(inline.runtime_import_source.as_deref(), Some("rt"));
    assert!(inline.provider_import_source.is_none());
}

#[test]
fn build_requires_files() {
    assert!(CliArgs::try_parse_from(["gts", "build"]).is_err());
}

#[test]
fn build_writes_javascript_next_to_the_input() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("card.gts");
    fs::write(&input, "const hp: number = 10;\ndefine card hp;").unwrap();

    let written = driver::build(&[input], None, false, &PartialTranspileOptions::default())
        .expect("build succeeds");
    assert_eq!(written, vec![dir.path().join("card.js")]);
    let js = fs::read_to_string(dir.path().join("card.js")).unwrap();
    assert!(js.contains("const hp = 10;"));
    assert!(js.contains("__gts_createDefine(__gts_rootVm"));
    assert!(!js.contains("sourceMappingURL"));
}

#[test]
fn build_with_source_map_and_out_dir() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("card.gts");
    fs::write(&input, "define card 1;").unwrap();
    let out_dir = dir.path().join("dist");

    let written = driver::build(
        &[input],
        Some(&out_dir),
        true,
        &PartialTranspileOptions::default(),
    )
    .expect("build succeeds");
    assert_eq!(
        written,
        vec![out_dir.join("card.js"), out_dir.join("card.js.map")]
    );
    let js = fs::read_to_string(out_dir.join("card.js")).unwrap();
    assert!(js.ends_with("\n//# sourceMappingURL=card.js.map"));
    let map: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("card.js.map")).unwrap()).unwrap();
    assert_eq!(map["version"], 3);
    assert_eq!(map["file"], "card.js");
    assert_eq!(map["sources"][0], "card.gts");
    assert_eq!(map["sourcesContent"][0], "define card 1;");
}

#[test]
fn build_uses_project_settings() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("package.json"),
        r#"{ "gamingTs": { "providerImportSource": "my-provider" } }"#,
    )
    .unwrap();
    let input = dir.path().join("card.gts");
    fs::write(&input, "define card 1;").unwrap();

    driver::build(&[input.clone()], None, false, &PartialTranspileOptions::default()).unwrap();
    let js = fs::read_to_string(dir.path().join("card.js")).unwrap();
    assert!(js.contains("import __gts_rootVm from \"my-provider/vm\";"));

    let inline = PartialTranspileOptions {
        provider_import_source: Some("cli-provider".to_string()),
        ..PartialTranspileOptions::default()
    };
    driver::build(&[input], None, false, &inline).unwrap();
    let js = fs::read_to_string(dir.path().join("card.js")).unwrap();
    assert!(js.contains("import __gts_rootVm from \"cli-provider/vm\";"));
}

#[test]
fn failed_build_writes_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let good = dir.path().join("good.gts");
    let bad = dir.path().join("bad.gts");
    fs::write(&good, "define a 1;").unwrap();
    fs::write(&bad, "enum E { A }").unwrap();

    let err = driver::build(&[good, bad], None, false, &PartialTranspileOptions::default())
        .expect_err("enum is rejected");
    assert!(format!("{err:#}").contains("TypeScript feature not supported: enums"));
    assert!(!dir.path().join("good.js").exists());
}

#[test]
fn missing_input_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = driver::build(
        &[dir.path().join("missing.gts")],
        None,
        false,
        &PartialTranspileOptions::default(),
    )
    .expect_err("missing file");
    assert!(err.to_string().starts_with("failed to read"));
}

#[test]
fn typings_prints_virtual_document() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("card.gts");
    fs::write(&input, "define card 1;").unwrap();

    let code = driver::typings(&input, false, &PartialTranspileOptions::default()).unwrap();
    assert!(code.starts_with("import __root_vm from \"@gi-tcg/core/gts/vm\";"));
    assert!(code.contains("__gts_attr_obj_3.card(1)"));

    let json = driver::typings(&input, true, &PartialTranspileOptions::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["code"], code.as_str());
    assert!(
        value["mappings"]
            .as_array()
            .is_some_and(|mappings| !mappings.is_empty())
    );
    assert!(value["mappings"][0]["sourceOffsets"].is_array());
}
