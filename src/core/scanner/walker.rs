//! Directory walking implementation using walkdir.

use super::{filter::ImageFilter, ScanResult};
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Descend into subdirectories; otherwise only the top level is read
    pub recursive: bool,
    /// Whether to include files whose name starts with `.`
    pub include_hidden: bool,
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ImageFilter,
}

impl WalkDirScanner {
    pub fn new(config: ScanConfig) -> Self {
        let filter = ImageFilter::new().with_hidden(config.include_hidden);
        Self { config, filter }
    }

    /// Scan `root` without progress reporting
    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        self.scan_with_events(root, &null_sender())
    }

    /// Scan `root`, reporting unreadable entries as events.
    ///
    /// A missing root is an error; anything unreadable below it is
    /// recorded in [`ScanResult::errors`] and skipped.
    pub fn scan_with_events(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();
        if !self.config.recursive {
            walker = walker.max_depth(1);
        }

        // Only file names are checked for a leading dot; directories are
        // always descended.
        let mut result = ScanResult::default();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_file()
                        || (entry.path_is_symlink() && entry.path().is_file());
                    if is_file && self.filter.should_include(entry.path()) {
                        result.images.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    let error = match e.io_error().map(|io| io.kind()) {
                        Some(std::io::ErrorKind::PermissionDenied) => {
                            ScanError::PermissionDenied { path: path.clone() }
                        }
                        _ => ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        },
                    };

                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    result.errors.push(error);
                }
            }
        }

        debug!(
            root = %root.display(),
            images = result.images.len(),
            errors = result.errors.len(),
            "scan complete"
        );
        events.send(Event::Scan(ScanEvent::Completed {
            total_images: result.images.len(),
        }));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap();
        path
    }

    fn names(result: &ScanResult) -> Vec<String> {
        result
            .images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn scan_empty_directory_returns_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let result = WalkDirScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();

        assert!(result.images.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_filters_by_extension_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "b.png");
        touch(temp_dir.path(), "a.JPG");
        touch(temp_dir.path(), "c.webp");
        touch(temp_dir.path(), "notes.txt");
        touch(temp_dir.path(), "scan.tiff");

        let result = WalkDirScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();

        assert_eq!(names(&result), vec!["a.JPG", "b.png", "c.webp"]);
    }

    #[test]
    fn non_recursive_scan_stays_at_top_level() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("nested");
        fs::create_dir(&subdir).unwrap();
        touch(temp_dir.path(), "top.png");
        touch(&subdir, "deep.png");

        let result = WalkDirScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();

        assert_eq!(names(&result), vec!["top.png"]);
    }

    #[test]
    fn recursive_scan_descends() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("nested");
        fs::create_dir(&subdir).unwrap();
        touch(temp_dir.path(), "top.png");
        touch(&subdir, "deep.png");

        let config = ScanConfig {
            recursive: true,
            ..Default::default()
        };
        let result = WalkDirScanner::new(config).scan(temp_dir.path()).unwrap();

        assert_eq!(result.images.len(), 2);
    }

    #[test]
    fn hidden_files_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "visible.jpg");
        touch(temp_dir.path(), ".hidden.jpg");

        let result = WalkDirScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();

        assert_eq!(names(&result), vec!["visible.jpg"]);
    }

    #[test]
    fn recursive_scan_enters_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let hidden_dir = temp_dir.path().join(".album");
        fs::create_dir(&hidden_dir).unwrap();
        let nested = touch(&hidden_dir, "photo.png");
        touch(&hidden_dir, ".thumb.png");

        let config = ScanConfig {
            recursive: true,
            ..Default::default()
        };
        let result = WalkDirScanner::new(config).scan(temp_dir.path()).unwrap();

        assert_eq!(result.images, vec![nested]);
    }

    #[test]
    fn directories_named_like_images_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("album.png")).unwrap();

        let result = WalkDirScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();

        assert!(result.images.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let result = WalkDirScanner::new(ScanConfig::default())
            .scan(Path::new("/nonexistent/path/12345"));

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }
}
