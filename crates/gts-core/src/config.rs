//! Project options discovery.
//!
//! Options live in `package.json` under the `gamingTs` key. Resolution walks
//! from the source file's directory towards the filesystem root and takes the
//! first `package.json` carrying a `gamingTs` object. Unreadable or malformed
//! files count as absent. The result layers defaults, then project options,
//! then inline options.

use std::future::Future;
use std::io;
use std::path::{Component, Path, PathBuf};

use gts_common::{PartialTranspileOptions, TranspileOptions};
use tracing::{debug, debug_span, trace, warn};

const PACKAGE_JSON: &str = "package.json";
const CONFIG_KEY: &str = "gamingTs";

/// Where the upward search starts from and where it ends.
#[derive(Debug, Clone, Default)]
pub struct ResolveConfigOptions {
    /// Base for a relative file path. Defaults to the process working directory.
    pub cwd: Option<PathBuf>,
    /// Last directory searched.
    pub stop_dir: Option<PathBuf>,
}

/// Resolve the options for `file_path`, reading files through `read_file`.
pub fn resolve_config<F>(
    file_path: impl AsRef<Path>,
    inline: &PartialTranspileOptions,
    options: &ResolveConfigOptions,
    mut read_file: F,
) -> TranspileOptions
where
    F: FnMut(&Path) -> io::Result<String>,
{
    let _span = debug_span!("resolve_config", file = %file_path.as_ref().display()).entered();
    let mut project = None;
    for candidate in package_json_candidates(file_path.as_ref(), options) {
        if let Some(found) = project_options(&candidate, read_file(&candidate)) {
            project = Some(found);
            break;
        }
    }
    merge(project, inline)
}

/// [`resolve_config`] with an asynchronous reader.
pub async fn resolve_config_async<F, Fut>(
    file_path: impl AsRef<Path>,
    inline: &PartialTranspileOptions,
    options: &ResolveConfigOptions,
    mut read_file: F,
) -> TranspileOptions
where
    F: FnMut(PathBuf) -> Fut,
    Fut: Future<Output = io::Result<String>>,
{
    let candidates = package_json_candidates(file_path.as_ref(), options);
    let mut project = None;
    for candidate in candidates {
        let content = read_file(candidate.clone()).await;
        if let Some(found) = project_options(&candidate, content) {
            project = Some(found);
            break;
        }
    }
    merge(project, inline)
}

/// [`resolve_config`] reading from the filesystem.
pub fn resolve_config_from_fs(
    file_path: impl AsRef<Path>,
    inline: &PartialTranspileOptions,
    options: &ResolveConfigOptions,
) -> TranspileOptions {
    resolve_config(file_path, inline, options, |path| std::fs::read_to_string(path))
}

/// [`resolve_config_async`] reading from the filesystem.
pub async fn resolve_config_from_fs_async(
    file_path: impl AsRef<Path>,
    inline: &PartialTranspileOptions,
    options: &ResolveConfigOptions,
) -> TranspileOptions {
    resolve_config_async(file_path, inline, options, |path| {
        futures::future::ready(std::fs::read_to_string(path))
    })
    .await
}

/// Every `package.json` path the search may read, nearest first.
fn package_json_candidates(file_path: &Path, options: &ResolveConfigOptions) -> Vec<PathBuf> {
    let cwd = options
        .cwd
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let absolute = normalize(&cwd.join(file_path));
    let stop_dir = options.stop_dir.as_ref().map(|dir| normalize(&cwd.join(dir)));

    let mut candidates = Vec::new();
    let mut current = absolute.parent();
    while let Some(dir) = current {
        candidates.push(dir.join(PACKAGE_JSON));
        if stop_dir.as_deref() == Some(dir) {
            break;
        }
        current = dir.parent();
    }
    candidates
}

/// Collapse `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// The `gamingTs` block of a `package.json`, if it has a usable one.
fn project_options(path: &Path, content: io::Result<String>) -> Option<PartialTranspileOptions> {
    let content = match content {
        Ok(content) => content,
        Err(err) => {
            trace!(path = %path.display(), %err, "no package.json");
            return None;
        }
    };
    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(err) => {
            trace!(path = %path.display(), %err, "unparsable package.json");
            return None;
        }
    };
    let block = value.get(CONFIG_KEY).filter(|block| block.is_object())?;
    match serde_json::from_value(block.clone()) {
        Ok(options) => {
            debug!(path = %path.display(), "project options found");
            Some(options)
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring malformed gamingTs block");
            None
        }
    }
}

fn merge(
    project: Option<PartialTranspileOptions>,
    inline: &PartialTranspileOptions,
) -> TranspileOptions {
    let defaults = TranspileOptions::default();
    let with_project = match &project {
        Some(project) => defaults.merged_with(project),
        None => defaults,
    };
    with_project.merged_with(inline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_stop_at_stop_dir() {
        let options = ResolveConfigOptions {
            cwd: Some(PathBuf::from("/repo")),
            stop_dir: Some(PathBuf::from("/repo")),
        };
        let candidates = package_json_candidates(Path::new("pkg/src/card.gts"), &options);
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/repo/pkg/src/package.json"),
                PathBuf::from("/repo/pkg/package.json"),
                PathBuf::from("/repo/package.json"),
            ]
        );
    }

    #[test]
    fn candidates_reach_the_root() {
        let options = ResolveConfigOptions::default();
        let candidates = package_json_candidates(Path::new("/a/b.gts"), &options);
        assert_eq!(
            candidates,
            vec![PathBuf::from("/a/package.json"), PathBuf::from("/package.json")]
        );
    }

    #[test]
    fn normalize_collapses_dot_segments() {
        assert_eq!(
            normalize(Path::new("/repo/pkg/../x/./card.gts")),
            PathBuf::from("/repo/x/card.gts")
        );
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("../a/../b")), PathBuf::from("../b"));
    }

    #[test]
    fn non_object_block_is_absent() {
        let path = Path::new("package.json");
        assert!(project_options(path, Ok(r#"{ "gamingTs": "x" }"#.to_string())).is_none());
        assert!(project_options(path, Ok("{".to_string())).is_none());
        assert!(project_options(path, Ok("{}".to_string())).is_none());
        assert!(project_options(path, Ok(r#"{ "gamingTs": {} }"#.to_string())).is_some());
    }
}
