//! JSON file helpers for the durable store and the config writer.
//!
//! Writes go to a `.tmp` sibling first and are renamed over the target, so a
//! crash mid-write leaves the previous file intact. There is no locking.

use std::io;
use std::path::Path;

/// Serialize `data` as 2-space indented JSON and write it to `path`.
///
/// Non-ASCII text is written verbatim, not escaped.
pub fn atomic_write_json<T: serde::Serialize + ?Sized>(path: &Path, data: &T) -> io::Result<()> {
    let mut json = serde_json::to_string_pretty(data).map_err(io::Error::other)?;
    json.push('\n');
    atomic_write(path, json.as_bytes())
}

/// Write raw bytes to `path` via a temporary sibling and a rename.
///
/// Creates parent directories if they don't exist.
pub fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, data)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Load and deserialize JSON from a file.
///
/// Returns `Ok(None)` if the file doesn't exist and `Err` on I/O or
/// deserialization failures.
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> io::Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)?;
    let value =
        serde_json::from_str(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CatalogEntry;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_load_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("user_characters.json");
        let entries = vec![CatalogEntry::draft("Summer"), CatalogEntry::draft("Beth")];

        atomic_write_json(&path, &entries).unwrap();
        let loaded: Option<Vec<CatalogEntry>> = load_json(&path).unwrap();
        assert_eq!(loaded, Some(entries));
    }

    #[test]
    fn test_write_preserves_non_ascii() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("user_characters.json");

        atomic_write_json(&path, &vec![CatalogEntry::draft("Морті")]).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Морті"));
        assert!(!raw.contains("\\u"));
        assert!(raw.contains("\n  {"), "expected 2-space indentation:\n{raw}");
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        atomic_write_json(&path, &Vec::<CatalogEntry>::new()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_load_json_nonexistent() {
        let result: io::Result<Option<Vec<CatalogEntry>>> =
            load_json(Path::new("/nonexistent/user_characters.json"));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_load_json_malformed_is_invalid_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{ not json").unwrap();

        let err = load_json::<Vec<CatalogEntry>>(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
