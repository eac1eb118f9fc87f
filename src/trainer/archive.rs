//! Dataset archive unpacking

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Extract every entry of `archive_path` into `dest`, then delete the archive.
///
/// The archive is opened and every entry name checked before `dest` is
/// created, so a missing or corrupt archive, or one with an entry escaping
/// `dest`, leaves the filesystem untouched. Returns the number of files
/// written.
pub fn unpack_archive(archive_path: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound(archive_path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if entry.enclosed_name().is_none() {
            return Err(Error::UnsafeEntry(entry.name().to_string()));
        }
    }

    info!(
        archive = %archive_path.display(),
        dest = %dest.display(),
        entries = archive.len(),
        "Unzipping data"
    );
    fs::create_dir_all(dest)?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(Error::UnsafeEntry(entry.name().to_string()));
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        debug!(path = %out_path.display(), "extracted");
        written += 1;
    }

    // Drop the reader before removing the file it holds open.
    drop(archive);
    fs::remove_file(archive_path)?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, files: &[(&str, &str)]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        for (name, content) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_unpack_extracts_and_removes_archive() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("data.zip");
        write_zip(
            &archive,
            &[
                ("data.yaml", "nc: 3\n"),
                ("train/images/a.jpg", "jpeg"),
                ("train/labels/a.txt", "0 0.5 0.5 0.1 0.1\n"),
            ],
        );
        let dest = dir.path().join("workspace");

        let written = unpack_archive(&archive, &dest).unwrap();

        assert_eq!(written, 3);
        assert!(!archive.exists());
        assert_eq!(
            fs::read_to_string(dest.join("data.yaml")).unwrap(),
            "nc: 3\n"
        );
        assert!(dest.join("train/labels/a.txt").is_file());
    }

    #[test]
    fn test_missing_archive_has_no_side_effects() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("workspace");

        let err = unpack_archive(&dir.path().join("missing.zip"), &dest).unwrap_err();

        assert!(matches!(err, Error::FileNotFound(_)));
        assert!(!dest.exists());
    }

    #[test]
    fn test_corrupt_archive_is_kept() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("data.zip");
        fs::write(&archive, b"definitely not a zip file").unwrap();
        let dest = dir.path().join("workspace");

        let err = unpack_archive(&archive, &dest).unwrap_err();

        assert!(matches!(err, Error::Archive(_) | Error::Io(_)));
        assert!(archive.exists());
        assert!(!dest.exists());
    }

    #[test]
    fn test_escaping_entry_rejected_without_side_effects() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("data.zip");
        write_zip(
            &archive,
            &[("data.yaml", "nc: 3\n"), ("../evil.txt", "escaped")],
        );
        let dest = dir.path().join("workspace");

        let err = unpack_archive(&archive, &dest).unwrap_err();

        assert!(matches!(err, Error::UnsafeEntry(ref name) if name == "../evil.txt"));
        assert!(!dest.exists());
        assert!(!dir.path().join("evil.txt").exists());
        assert!(archive.exists());
    }

    #[test]
    fn test_directory_entries() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("data.zip");
        {
            let mut zip = zip::ZipWriter::new(File::create(&archive).unwrap());
            let options = SimpleFileOptions::default();
            zip.add_directory("valid/", options).unwrap();
            zip.start_file("data.yaml", options).unwrap();
            zip.write_all(b"nc: 1\n").unwrap();
            zip.finish().unwrap();
        }

        let written = unpack_archive(&archive, dir.path()).unwrap();
        assert_eq!(written, 1);
        assert!(dir.path().join("valid").is_dir());
    }
}
