//! File-based data source.
//!
//! Polls a JSON file for dashboard snapshots.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use super::{DashboardSnapshot, DataSource};

/// A data source that reads dashboard snapshots from a JSON file.
///
/// Useful for replaying a saved `/api/dashboard` response, or for a
/// sidecar that periodically dumps the appliance's status to disk.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Whether a file stamped `modified` should be re-read. Before the first
    /// good read every poll tries; after it, only a newer mtime counts, so a
    /// deleted file leaves the last snapshot in place.
    fn needs_read(&self, modified: Option<SystemTime>) -> bool {
        match self.last_modified {
            None => true,
            Some(last) => modified.is_some_and(|m| m > last),
        }
    }

    /// Read and parse the file.
    fn read_file(&mut self) -> Option<DashboardSnapshot> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(snapshot) => {
                    self.last_error = None;
                    Some(snapshot)
                }
                Err(e) => {
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<DashboardSnapshot> {
        let modified = self.modified_time();
        if !self.needs_read(modified) {
            return None;
        }

        let snapshot = self.read_file()?;
        debug!(path = %self.path.display(), ?modified, "read dashboard snapshot");
        self.last_modified = modified;
        Some(snapshot)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "statman": [{"name": "net.eth0.rx", "value": 100}],
            "cpu_usage": {"idle": 90},
            "logger": ["ready"]
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/test.json");
        assert_eq!(source.path(), Path::new("/tmp/test.json"));
        assert_eq!(source.description(), "file: /tmp/test.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        // First poll should return data
        let snapshot = source.poll();
        assert!(snapshot.is_some());
        let snapshot = snapshot.unwrap();
        assert_eq!(snapshot.statman[0].name, "net.eth0.rx");
        assert_eq!(snapshot.logger, vec!["ready"]);

        // Second poll without file change should return None
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let _ = source.poll();

        // Modify the file (need to wait a bit for mtime to change)
        std::thread::sleep(std::time::Duration::from_millis(10));
        file.rewind().unwrap();
        writeln!(file, r#"{{"statman": [{{"name": "changed", "value": 1}}]}}"#).unwrap();
        let pos = file.stream_position().unwrap();
        file.as_file().set_len(pos).unwrap();
        file.flush().unwrap();

        // Note: filesystems with coarse mtime resolution may not see the change
        if let Some(s) = source.poll() {
            assert_eq!(s.statman[0].name, "changed");
        }
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/dashboard.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_file_source_recovers_after_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{").unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_none());
        assert!(source.error().is_some());

        file.rewind().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();
        file.flush().unwrap();

        // Nothing was read successfully yet, so the next poll retries
        assert!(source.poll().is_some());
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_keeps_last_snapshot_when_file_is_deleted() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), sample_json()).unwrap();
        let path = file.path().to_path_buf();

        let mut source = FileSource::new(&path);
        assert!(source.poll().is_some());

        file.close().unwrap();
        assert!(!path.exists());
        assert!(source.poll().is_none());
        // The deleted file is never read, so no error replaces the good data
        assert!(source.error().is_none());
    }
}
