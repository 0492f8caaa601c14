//! Folder walker
//!
//! Runs a per-file action over every matching file below a folder, one file
//! at a time, and reports each outcome as it happens. Failures are collected
//! and summarized once the walk is done; they never stop the walk.

use crate::config::WalkConfig;
use crate::error::{Error, Result};
use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A failure recorded during a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// Summary of one walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Number of files the action ran on
    pub visited: usize,
    /// Failures in the order they happened
    pub errors: Vec<FileError>,
}

impl WalkReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Walk `config.folder` and run `action` on every file matching the pattern
///
/// Matching files are collected before any action runs, so renames made by
/// the action never feed back into the walk. Files are visited in the order
/// the directory enumeration yields them. For each file `"{index}: {path}"`
/// is written (1-based), followed by the action's result or its error.
/// After the walk `Done!` is written and, if anything failed, the list of
/// failures.
///
/// Fails before walking when the folder is missing; any later failure is
/// recorded in the report instead.
pub fn walk_folder<T, F, W>(config: &WalkConfig, mut action: F, out: &mut W) -> Result<WalkReport>
where
    T: Display,
    F: FnMut(&Path) -> Result<T>,
    W: Write,
{
    if !config.folder.is_dir() {
        return Err(Error::FolderNotFound {
            path: config.folder.clone(),
        });
    }

    let mut report = WalkReport::default();
    let files = collect_files(config, &mut report, out)?;
    debug!(count = files.len(), folder = ?config.folder, "Collected matching files");

    for path in &files {
        report.visited += 1;
        writeln!(out, "{}: {}", report.visited, path.display())?;

        match action(path) {
            Ok(result) => writeln!(out, "   {result}")?,
            Err(e) => {
                let message = e.to_string();
                warn!(?path, %message, "Failed to handle file");
                writeln!(out, "   Error: {message}")?;
                report.errors.push(FileError {
                    path: path.clone(),
                    message,
                });
            }
        }
    }

    write_summary(&report, out)?;
    info!(
        visited = report.visited,
        errors = report.errors.len(),
        "Walk complete"
    );
    Ok(report)
}

/// Collect matching files below `config.folder`, following symlinks
///
/// Enumeration failures (unreadable folders, symlink loops) are written
/// and recorded in `report`.
fn collect_files<W: Write>(
    config: &WalkConfig,
    report: &mut WalkReport,
    out: &mut W,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(&config.folder).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(|| config.folder.clone(), Path::to_path_buf);
                let message = Error::from(e).to_string();
                warn!(?path, %message, "Failed to enumerate");
                writeln!(out, "Error: {}: {}", path.display(), message)?;
                report.errors.push(FileError { path, message });
                continue;
            }
        };

        if entry.file_type().is_file() && config.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn write_summary<W: Write>(report: &WalkReport, out: &mut W) -> Result<()> {
    writeln!(out, "Done!")?;
    if report.has_errors() {
        writeln!(out, "{} error(s):", report.errors.len())?;
        for error in &report.errors {
            writeln!(out, "  {}: {}", error.path.display(), error.message)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessOptions;
    use crate::fixtures;
    use crate::process::process_file;
    use chrono::{Local, TimeZone};
    use exif::Tag;
    use filetime::FileTime;
    use std::fs;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        let config = WalkConfig::new(dir.path(), None).unwrap();
        let mut out = Vec::new();

        let report = walk_folder(&config, |_| Ok("never"), &mut out).unwrap();

        assert_eq!(report, WalkReport::default());
        assert_eq!(output(out), "Done!\n");
    }

    #[test]
    fn test_failure_does_not_stop_the_walk() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["first.jpg", "second.jpg", "third.jpg"] {
            fs::write(dir.path().join(name), name).unwrap();
        }
        let config = WalkConfig::new(dir.path(), Some("*.jpg")).unwrap();
        let mut seen = Vec::new();
        let mut out = Vec::new();

        let report = walk_folder(
            &config,
            |path| {
                let name = path.file_name().unwrap().to_string_lossy().into_owned();
                seen.push(name.clone());
                if name == "second.jpg" {
                    Err(Error::UnsupportedFormat {
                        path: path.to_path_buf(),
                    })
                } else {
                    Ok(name)
                }
            },
            &mut out,
        )
        .unwrap();

        seen.sort();
        assert_eq!(seen, vec!["first.jpg", "second.jpg", "third.jpg"]);
        assert_eq!(report.visited, 3);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, dir.path().join("second.jpg"));

        let text = output(out);
        assert!(text.contains("1: "));
        assert!(text.contains("3: "));
        assert!(text.contains("   Error: Unsupported file format"));
        assert!(text.contains("Done!\n1 error(s):\n"));
        assert!(text.ends_with(&format!(
            "  {}: Unsupported file format: {}\n",
            dir.path().join("second.jpg").display(),
            dir.path().join("second.jpg").display()
        )));
    }

    #[test]
    fn test_recursive_and_pattern_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2019").join("summer");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("a.jpg"), "a").unwrap();
        fs::write(dir.path().join("b.mov"), "b").unwrap();
        fs::write(nested.join("c.jpg"), "c").unwrap();
        fs::create_dir(dir.path().join("folder.jpg")).unwrap();

        let config = WalkConfig::new(dir.path(), Some("*.jpg")).unwrap();
        let mut visited = Vec::new();
        let mut out = Vec::new();

        let report = walk_folder(
            &config,
            |path| {
                visited.push(path.to_path_buf());
                Ok("ok")
            },
            &mut out,
        )
        .unwrap();

        visited.sort();
        assert_eq!(visited, vec![dir.path().join("a.jpg"), nested.join("c.jpg")]);
        assert_eq!(report.visited, 2);
        assert!(!report.has_errors());
        assert!(output(out).ends_with("Done!\n"));
    }

    #[test]
    fn test_process_walk_without_renames() {
        let dir = tempfile::tempdir().unwrap();
        let fields = [fixtures::ascii_field(Tag::DateTimeOriginal, "2016:09:10 11:12:13")];
        fixtures::write_jpeg(&dir.path().join("one.jpg"), &fields);
        fs::write(dir.path().join("broken.jpg"), "not an image").unwrap();
        fixtures::write_jpeg(&dir.path().join("three.jpg"), &fields);
        fixtures::write_bare_jpeg(&dir.path().join("skipped.jpeg"));

        let config = WalkConfig::new(dir.path(), Some("*.jpg")).unwrap();
        let options = ProcessOptions { rename: false };
        let mut out = Vec::new();

        let report = walk_folder(&config, |path| process_file(path, options), &mut out).unwrap();

        assert_eq!(report.visited, 3);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, dir.path().join("broken.jpg"));

        let expected = Local.with_ymd_and_hms(2016, 9, 10, 11, 12, 13).unwrap();
        for name in ["one.jpg", "three.jpg"] {
            let meta = fs::metadata(dir.path().join(name)).unwrap();
            let mtime = FileTime::from_last_modification_time(&meta);
            assert_eq!(mtime.unix_seconds(), expected.timestamp(), "{name}");
        }

        let text = output(out);
        assert!(text.contains("2016-09-10 11:12:13 (Exif SubIFD / DateTimeOriginal)"));
        assert!(!text.contains(" -> "));
    }

    #[test]
    fn test_renames_inside_the_folder_are_not_walked_again() {
        let dir = tempfile::tempdir().unwrap();
        let fields = [fixtures::ascii_field(Tag::DateTimeOriginal, "2018:07:08 09:10:11")];
        let count = 200;
        for i in 0..count {
            fixtures::write_jpeg(&dir.path().join(format!("IMG_{i:04}.jpg")), &fields);
        }

        let config = WalkConfig::new(dir.path(), Some("*.jpg")).unwrap();
        let mut out = Vec::new();

        let report = walk_folder(
            &config,
            |path| process_file(path, ProcessOptions::default()),
            &mut out,
        )
        .unwrap();

        assert_eq!(report.visited, count);
        assert!(!report.has_errors());

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), count);
        assert!(names.contains(&"2018-07-08 091011.jpg".to_string()));
        assert!(names.contains(&format!("2018-07-08 091011[{count}].jpg")));
        assert!(!names.iter().any(|name| name.starts_with("IMG_")));
    }

    #[test]
    fn test_action_creating_files_sees_only_the_original_set() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            fs::write(dir.path().join(name), name).unwrap();
        }
        let config = WalkConfig::new(dir.path(), Some("*.jpg")).unwrap();
        let mut visited = Vec::new();
        let mut out = Vec::new();

        let report = walk_folder(
            &config,
            |path| {
                visited.push(path.to_path_buf());
                let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
                let copy = path.with_file_name(format!("{stem}-copy.jpg"));
                fs::copy(path, &copy)?;
                Ok(copy.display().to_string())
            },
            &mut out,
        )
        .unwrap();

        visited.sort();
        assert_eq!(report.visited, 3);
        assert_eq!(
            visited,
            vec![
                dir.path().join("a.jpg"),
                dir.path().join("b.jpg"),
                dir.path().join("c.jpg")
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_are_followed() {
        let dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let target = elsewhere.path().join("real.jpg");
        fs::write(&target, "real").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("link.jpg")).unwrap();

        let config = WalkConfig::new(dir.path(), Some("*.jpg")).unwrap();
        let mut visited = Vec::new();
        let mut out = Vec::new();

        let report = walk_folder(
            &config,
            |path| {
                visited.push(path.to_path_buf());
                Ok("ok")
            },
            &mut out,
        )
        .unwrap();

        assert_eq!(report.visited, 1);
        assert_eq!(visited, vec![dir.path().join("link.jpg")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_recorded_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        std::os::unix::fs::symlink(dir.path(), nested.join("back")).unwrap();
        fs::write(dir.path().join("a.jpg"), "a").unwrap();

        let config = WalkConfig::new(dir.path(), Some("*.jpg")).unwrap();
        let mut out = Vec::new();

        let report = walk_folder(&config, |_| Ok("ok"), &mut out).unwrap();

        assert_eq!(report.visited, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(output(out).contains("1 error(s):"));
    }

    #[test]
    fn test_missing_folder_fails_before_walking() {
        let dir = tempfile::tempdir().unwrap();
        let config = WalkConfig::new(dir.path().join("missing"), None).unwrap();
        let mut out = Vec::new();

        let err = walk_folder(&config, |_| Ok("never"), &mut out).unwrap_err();
        assert!(matches!(err, Error::FolderNotFound { .. }));
        assert!(out.is_empty());
    }
}
