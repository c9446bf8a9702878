use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for test sources
pub fn create_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Create a file with the given content, creating parent directories
pub fn create_test_file(dir: &TempDir, relative_path: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.path().join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(&file_path, content).expect("Failed to write test file");
    file_path
}
