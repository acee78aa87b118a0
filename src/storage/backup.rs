//! Point-in-time copies of the database file.
//!
//! A backup is a byte copy of the single database file. The copy lands in a
//! sibling temp file first and is renamed into place, so the destination is
//! either the old file or a complete new one.

use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::{Result, TrackerError};
use crate::util::time::{file_stamp, parse_file_stamp};

const BACKUP_PREFIX: &str = "equipment_backup_";
const BACKUP_EXTENSION: &str = "db";

/// Backup file metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub path: PathBuf,
    pub timestamp: DateTime<Utc>,
    pub size: u64,
}

/// `equipment_backup_YYYYMMDD_HHMMSS.db` for the given instant.
#[must_use]
pub fn default_backup_file_name(now: DateTime<Utc>) -> String {
    format!("{BACKUP_PREFIX}{}.{BACKUP_EXTENSION}", file_stamp(now))
}

/// Copy `source` to `destination`, replacing any existing file.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns `Backup` if the source is missing, the destination is the source
/// itself, or any filesystem step fails.
pub fn copy_database_file(source: &Path, destination: &Path) -> Result<u64> {
    if !source.is_file() {
        return Err(TrackerError::backup(
            source,
            "source database file does not exist",
        ));
    }

    if same_file(source, destination) {
        return Err(TrackerError::backup(
            destination,
            "destination is the live database",
        ));
    }

    let file_name = destination
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| TrackerError::backup(destination, "destination has no file name"))?;
    let staging = destination.with_file_name(format!(".{file_name}.partial"));

    let fail = |err: std::io::Error| TrackerError::backup(destination, err.to_string());

    let bytes = match fs::copy(source, &staging).and_then(|bytes| {
        File::open(&staging)?.sync_all()?;
        Ok(bytes)
    }) {
        Ok(bytes) => bytes,
        Err(err) => {
            let _ = fs::remove_file(&staging);
            return Err(fail(err));
        }
    };

    if let Err(err) = fs::rename(&staging, destination) {
        let _ = fs::remove_file(&staging);
        return Err(fail(err));
    }

    tracing::debug!(
        "Copied {} bytes from {} to {}",
        bytes,
        source.display(),
        destination.display()
    );
    Ok(bytes)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Backups in `dir` sorted newest first.
///
/// Only files named like [`default_backup_file_name`] are listed.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_backups(dir: &Path) -> Result<Vec<BackupEntry>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(timestamp) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(backup_timestamp)
        else {
            continue;
        };

        let size = entry.metadata()?.len();
        backups.push(BackupEntry {
            path,
            timestamp,
            size,
        });
    }

    backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.path.cmp(&a.path)));
    Ok(backups)
}

fn backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(&format!(".{BACKUP_EXTENSION}"))?;
    parse_file_stamp(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn default_name_uses_file_stamp() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 3, 4, 5, 6).unwrap();
        assert_eq!(
            default_backup_file_name(ts),
            "equipment_backup_20260203_040506.db"
        );
    }

    #[test]
    fn copy_replaces_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("equipment.db");
        let dest = dir.path().join("copy.db");
        fs::write(&source, b"new contents").unwrap();
        fs::write(&dest, b"stale").unwrap();

        let bytes = copy_database_file(&source, &dest).unwrap();

        assert_eq!(bytes, 12);
        assert_eq!(fs::read(&dest).unwrap(), b"new contents");
        assert!(!dir.path().join(".copy.db.partial").exists());
    }

    #[test]
    fn missing_source_is_a_backup_error() {
        let dir = TempDir::new().unwrap();
        let err = copy_database_file(&dir.path().join("nope.db"), &dir.path().join("out.db"))
            .unwrap_err();
        assert!(matches!(err, TrackerError::Backup { .. }));
    }

    #[test]
    fn unwritable_destination_is_a_backup_error() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("equipment.db");
        fs::write(&source, b"x").unwrap();

        let err = copy_database_file(&source, &dir.path().join("missing/dir/out.db")).unwrap_err();
        assert!(matches!(err, TrackerError::Backup { .. }));
    }

    #[test]
    fn refuses_to_overwrite_source() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("equipment.db");
        fs::write(&source, b"x").unwrap();

        let err = copy_database_file(&source, &source).unwrap_err();
        assert!(matches!(err, TrackerError::Backup { .. }));
        assert_eq!(fs::read(&source).unwrap(), b"x");
    }

    #[test]
    fn lists_only_backups_newest_first() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("equipment_backup_20260101_000000.db"), b"a").unwrap();
        fs::write(dir.path().join("equipment_backup_20260301_000000.db"), b"bb").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        fs::write(dir.path().join("equipment_backup_garbage.db"), b"ignored").unwrap();

        let backups = list_backups(dir.path()).unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(backups[0].size, 2);
        assert!(backups[0].timestamp > backups[1].timestamp);
    }

    #[test]
    fn missing_dir_lists_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(list_backups(&dir.path().join("none")).unwrap().is_empty());
    }
}
