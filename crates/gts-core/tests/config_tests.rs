//! Tests for project options resolution.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gts_core::{
    PartialTranspileOptions, ResolveConfigOptions, TranspileOptions, resolve_config,
    resolve_config_async, resolve_config_from_fs, resolve_config_from_fs_async,
};

const PACKAGE_JSON: &str = r#"{ "name": "cards", "gamingTs": { "runtimeImportSource": "test-runtime" } }"#;

fn repo_options() -> ResolveConfigOptions {
    ResolveConfigOptions {
        cwd: Some(PathBuf::from("/repo")),
        stop_dir: None,
    }
}

fn repo_reader(path: &Path) -> io::Result<String> {
    if path == Path::new("/repo/package.json") {
        Ok(PACKAGE_JSON.to_string())
    } else if path == Path::new("/repo/src/package.json") {
        Ok("{}".to_string())
    } else {
        Err(io::Error::from(io::ErrorKind::NotFound))
    }
}

#[test]
fn nearest_package_with_settings_wins() {
    let resolved = resolve_config(
        "src/file.gts",
        &PartialTranspileOptions::default(),
        &repo_options(),
        repo_reader,
    );
    assert_eq!(resolved.runtime_import_source, "test-runtime");
    assert_eq!(
        resolved.provider_import_source,
        TranspileOptions::default().provider_import_source
    );
}

#[test]
fn walk_reads_each_directory_upwards() {
    let mut read = Vec::new();
    resolve_config(
        "src/cards/file.gts",
        &PartialTranspileOptions::default(),
        &repo_options(),
        |path| {
            read.push(path.to_path_buf());
            repo_reader(path)
        },
    );
    assert_eq!(
        read,
        vec![
            PathBuf::from("/repo/src/cards/package.json"),
            PathBuf::from("/repo/src/package.json"),
            PathBuf::from("/repo/package.json"),
        ]
    );
}

#[test]
fn parent_segments_are_resolved_before_walking() {
    let options = ResolveConfigOptions {
        cwd: Some(PathBuf::from("/repo/src")),
        stop_dir: Some(PathBuf::from("../..")),
    };
    let mut read = Vec::new();
    let resolved = resolve_config(
        "../other/card.gts",
        &PartialTranspileOptions::default(),
        &options,
        |path| {
            read.push(path.to_path_buf());
            repo_reader(path)
        },
    );
    assert_eq!(
        read,
        vec![
            PathBuf::from("/repo/other/package.json"),
            PathBuf::from("/repo/package.json"),
        ]
    );
    assert_eq!(resolved.runtime_import_source, "test-runtime");
}

#[test]
fn inline_options_take_precedence() {
    let inline = PartialTranspileOptions {
        runtime_import_source: Some("inline-runtime".to_string()),
        query_bindings: Some(vec!["self".to_string()]),
        ..PartialTranspileOptions::default()
    };
    let resolved = resolve_config("src/file.gts", &inline, &repo_options(), repo_reader);
    assert_eq!(resolved.runtime_import_source, "inline-runtime");
    assert_eq!(resolved.query_bindings, vec!["self".to_string()]);
    assert_eq!(resolved.shortcut_function_preludes.len(), 8);
}

#[test]
fn stop_dir_ends_the_search() {
    let options = ResolveConfigOptions {
        cwd: Some(PathBuf::from("/repo")),
        stop_dir: Some(PathBuf::from("/repo/src")),
    };
    let resolved = resolve_config(
        "src/file.gts",
        &PartialTranspileOptions::default(),
        &options,
        repo_reader,
    );
    assert_eq!(resolved, TranspileOptions::default());
}

#[test]
fn missing_settings_fall_back_to_defaults() {
    let resolved = resolve_config(
        "/elsewhere/file.gts",
        &PartialTranspileOptions::default(),
        &ResolveConfigOptions::default(),
        |_| Err(io::Error::from(io::ErrorKind::PermissionDenied)),
    );
    assert_eq!(resolved, TranspileOptions::default());
}

#[test]
fn async_reader_resolves_the_same() {
    let resolved = futures::executor::block_on(resolve_config_async(
        "src/file.gts",
        &PartialTranspileOptions::default(),
        &repo_options(),
        |path: PathBuf| async move { repo_reader(&path) },
    ));
    assert_eq!(resolved.runtime_import_source, "test-runtime");
}

#[test]
fn filesystem_resolution() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    fs::write(
        root.join("package.json"),
        r#"{ "gamingTs": { "providerImportSource": "my-provider", "shortcutFunctionPreludes": ["a", "b"] } }"#,
    )
    .unwrap();
    fs::create_dir_all(root.join("pkg/src")).unwrap();
    fs::write(root.join("pkg/package.json"), "{ not json").unwrap();
    let file = root.join("pkg/src/card.gts");
    let options = ResolveConfigOptions {
        cwd: None,
        stop_dir: Some(root.to_path_buf()),
    };

    let resolved = resolve_config_from_fs(&file, &PartialTranspileOptions::default(), &options);
    assert_eq!(resolved.provider_import_source, "my-provider");
    assert_eq!(
        resolved.shortcut_function_preludes,
        vec!["a".to_string(), "b".to_string()]
    );

    let resolved_async = futures::executor::block_on(resolve_config_from_fs_async(
        &file,
        &PartialTranspileOptions::default(),
        &options,
    ));
    assert_eq!(resolved_async, resolved);
}

#[test]
fn filesystem_resolution_respects_stop_dir() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    fs::write(
        root.join("package.json"),
        r#"{ "gamingTs": { "runtimeImportSource": "outer" } }"#,
    )
    .unwrap();
    fs::create_dir_all(root.join("inner")).unwrap();
    let options = ResolveConfigOptions {
        cwd: Some(root.to_path_buf()),
        stop_dir: Some(root.join("inner")),
    };
    let resolved = resolve_config_from_fs(
        "inner/card.gts",
        &PartialTranspileOptions::default(),
        &options,
    );
    assert_eq!(resolved, TranspileOptions::default());
}
