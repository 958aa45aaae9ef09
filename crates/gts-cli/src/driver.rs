use anyhow::{Context, Result};
use gts_core::{
    PartialTranspileOptions, ResolveConfigOptions, TranspileOptions, resolve_config_from_fs,
    transpile, transpile_for_volar,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A file to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Transpile every file, then write all outputs. Nothing is written when any
/// file fails.
pub fn build(
    files: &[PathBuf],
    out_dir: Option<&Path>,
    source_map: bool,
    inline: &PartialTranspileOptions,
) -> Result<Vec<PathBuf>> {
    let mut outputs = Vec::new();
    for file in files {
        let options = options_for(file, inline);
        outputs.extend(emit_file(file, out_dir, source_map, &options)?);
    }
    write_outputs(&outputs)
}

/// The virtual TypeScript document for `file`, or with `mappings` the
/// document and its mappings as JSON.
pub fn typings(file: &Path, mappings: bool, inline: &PartialTranspileOptions) -> Result<String> {
    let source = read_source(file)?;
    let options = options_for(file, inline);
    let result = transpile_for_volar(&source, &display_name(file), &options)
        .with_context(|| format!("failed to transpile {}", file.display()))?;
    if mappings {
        serde_json::to_string_pretty(&result).context("failed to serialize mappings")
    } else {
        Ok(result.code)
    }
}

fn options_for(file: &Path, inline: &PartialTranspileOptions) -> TranspileOptions {
    let options = resolve_config_from_fs(file, inline, &ResolveConfigOptions::default());
    debug!(file = %file.display(), ?options, "resolved options");
    options
}

fn read_source(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

/// The `.js` output and, with `source_map`, its `.js.map`.
pub fn emit_file(
    input: &Path,
    out_dir: Option<&Path>,
    source_map: bool,
    options: &TranspileOptions,
) -> Result<Vec<OutputFile>> {
    let source = read_source(input)?;
    let result = transpile(&source, &display_name(input), options)
        .with_context(|| format!("failed to transpile {}", input.display()))?;
    let js_path = js_output_path(input, out_dir);
    let mut contents = result.code;

    let mut outputs = Vec::with_capacity(2);
    let map = if source_map { result.source_map } else { None };
    if let Some(mut map) = map {
        let (map_path, map_name, output_name) = map_output_info(&js_path)
            .with_context(|| format!("invalid output path {}", js_path.display()))?;
        map.file = Some(output_name);
        append_source_mapping_url(&mut contents, &map_name);
        outputs.push(OutputFile {
            path: map_path,
            contents: map.to_json(),
        });
    }
    outputs.insert(
        0,
        OutputFile {
            path: js_path,
            contents,
        },
    );
    Ok(outputs)
}

fn js_output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let js = input.with_extension("js");
    match (out_dir, js.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => js,
    }
}

fn map_output_info(output_path: &Path) -> Option<(PathBuf, String, String)> {
    let output_name = output_path.file_name()?.to_string_lossy().into_owned();
    let map_name = format!("{output_name}.map");
    let map_path = output_path.with_file_name(&map_name);
    Some((map_path, map_name, output_name))
}

fn append_source_mapping_url(contents: &mut String, map_name: &str) {
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str("//# sourceMappingURL=");
    contents.push_str(map_name);
}

fn write_outputs(outputs: &[OutputFile]) -> Result<Vec<PathBuf>> {
    for output in outputs {
        if let Some(parent) = output.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        std::fs::write(&output.path, &output.contents)
            .with_context(|| format!("failed to write {}", output.path.display()))?;
        info!(path = %output.path.display(), "wrote");
    }
    Ok(outputs.iter().map(|output| output.path.clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths() {
        assert_eq!(
            js_output_path(Path::new("cards/a.gts"), None),
            PathBuf::from("cards/a.js")
        );
        assert_eq!(
            js_output_path(Path::new("cards/a.gts"), Some(Path::new("dist"))),
            PathBuf::from("dist/a.js")
        );
        let (map_path, map_name, output_name) =
            map_output_info(Path::new("dist/a.js")).unwrap();
        assert_eq!(map_path, PathBuf::from("dist/a.js.map"));
        assert_eq!(map_name, "a.js.map");
        assert_eq!(output_name, "a.js");
    }

    #[test]
    fn mapping_url_starts_a_new_line() {
        let mut contents = "f();".to_string();
        append_source_mapping_url(&mut contents, "a.js.map");
        assert_eq!(contents, "f();\n//# sourceMappingURL=a.js.map");
    }
}
