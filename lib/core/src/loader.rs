// Candidate text loading.
// A file that cannot be read becomes an empty document instead of failing the batch.

use std::fs;
use std::path::Path;
use tracing::warn;

use crate::{Document, Error, Result};

/// Read a file as UTF-8 text
pub fn load_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::Extraction {
        name: display_name(path),
        reason: e.to_string(),
    })?;

    String::from_utf8(bytes).map_err(|e| Error::Extraction {
        name: display_name(path),
        reason: e.to_string(),
    })
}

/// Load each path as a candidate named by its file name.
/// Extraction failures are logged and yield an empty document.
pub fn load_candidates<P: AsRef<Path>>(paths: &[P]) -> Vec<Document> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let name = display_name(path);
            match load_text(path) {
                Ok(text) => Document::new(name, text),
                Err(e) => {
                    warn!("{}; ranking it with empty text", e);
                    Document::empty(name)
                }
            }
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_candidates_uses_basename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice.txt");
        fs::write(&path, "rust developer").unwrap();

        let docs = load_candidates(&[&path]);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name(), "alice.txt");
        assert_eq!(docs[0].text(), "rust developer");
    }

    #[test]
    fn test_missing_file_becomes_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let good = dir.path().join("good.txt");
        fs::write(&good, "text").unwrap();

        let docs = load_candidates(&[&missing, &good]);
        assert_eq!(docs[0].name(), "missing.txt");
        assert!(docs[0].is_blank());
        assert_eq!(docs[1].text(), "text");
    }

    #[test]
    fn test_non_utf8_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let err = load_text(&path).unwrap_err();
        assert!(matches!(err, Error::Extraction { ref name, .. } if name == "scan.pdf"));
    }
}
