use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use super::paths::ensure_dir;

const TMP_SUFFIX: &str = "tmp";

/// Sibling staging path: `reports.json` -> `reports.json.tmp`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Replaces `path` with `data` by writing and syncing a staging file, then
/// renaming it over the target. The target is untouched if staging fails.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/data/reports.json")),
            PathBuf::from("/data/reports.json.tmp")
        );
        assert_eq!(
            tmp_path(Path::new("/data/reports")),
            PathBuf::from("/data/reports.tmp")
        );
    }

    #[test]
    fn replaces_contents_without_leaving_staging_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("state.json");
        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn failed_staging_preserves_original() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        write_atomic(&path, "original").unwrap();

        // A directory squatting on the staging path makes File::create fail.
        fs::create_dir_all(tmp_path(&path)).unwrap();
        assert!(write_atomic(&path, "replacement").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }
}
