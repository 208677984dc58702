use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Expand directories one level; other paths are passed through so that a
/// missing file surfaces as a per-file error rather than aborting the batch.
pub fn collect_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries = Vec::new();
            for entry in fs::read_dir(input)
                .with_context(|| format!("failed to list directory {}", input.display()))?
            {
                let entry = entry
                    .with_context(|| format!("failed to read entry in {}", input.display()))?;
                let path = entry.path();
                if path.is_file() {
                    entries.push(path);
                }
            }
            entries.sort();
            paths.extend(entries);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

pub fn read_window(path: &Path, window: usize) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    File::open(path)?
        .take(window as u64)
        .read_to_end(&mut buffer)?;
    Ok(buffer)
}

pub fn upload_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn expands_directories_one_level() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.zip"), b"PK\x03\x04").unwrap();
        fs::write(dir.path().join("a.gz"), b"\x1f\x8b\x08").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.rar"), b"Rar!").unwrap();

        let missing = PathBuf::from("/nonexistent/archcheck.zip");
        let paths = collect_paths(&[dir.path().to_path_buf(), missing.clone()]).unwrap();
        assert_eq!(
            paths,
            vec![dir.path().join("a.gz"), dir.path().join("b.zip"), missing]
        );
    }

    #[test]
    fn window_is_bounded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.bin");
        fs::write(&path, vec![7u8; 1000]).unwrap();
        assert_eq!(read_window(&path, 16).unwrap(), vec![7u8; 16]);
        assert_eq!(read_window(&path, 4096).unwrap().len(), 1000);
        assert!(read_window(&dir.path().join("absent"), 16).is_err());
    }

    #[test]
    fn huge_window_reads_only_what_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.gz");
        fs::write(&path, b"\x1f\x8b\x08\x00").unwrap();
        assert_eq!(read_window(&path, usize::MAX).unwrap(), b"\x1f\x8b\x08\x00");
    }

    #[test]
    fn upload_name_is_final_component() {
        assert_eq!(
            upload_name(Path::new("/srv/in/backup.TAR.GZ")).as_deref(),
            Some("backup.TAR.GZ")
        );
        assert_eq!(upload_name(Path::new("/")), None);
        assert!(default_jobs() >= 1);
    }
}
