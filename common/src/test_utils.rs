use std::path::PathBuf;

/// Returns the workspace root directory.
fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns the path to a file under `test_resources/` at the workspace root.
pub fn test_resource_path(name: &str) -> PathBuf {
    workspace_root().join("test_resources").join(name)
}

/// Reads a file under `test_resources/` into a string.
pub fn read_test_resource(name: &str) -> anyhow::Result<String> {
    let path = test_resource_path(name);
    std::fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("failed to read {}: {err}", path.display()))
}
