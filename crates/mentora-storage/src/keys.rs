//! Storage key generation
//!
//! All backends share the same key layout. Filenames are sanitized so a
//! client-supplied name can never influence the directory part of the key.

use uuid::Uuid;

/// Generate the storage key for a document: `documents/{document_ref}/{filename}`.
///
/// `document_ref` is a fresh UUID minted at upload time, not the database id;
/// the row does not exist yet when the object is written.
pub fn document_key(document_ref: Uuid, filename: &str) -> String {
    format!("documents/{}/{}", document_ref, sanitize_filename(filename))
}

/// Keep only the final path component and replace characters that are
/// unsafe in object keys.
fn sanitize_filename(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_key_layout() {
        let id = Uuid::new_v4();
        let key = document_key(id, "intro.pdf");
        assert_eq!(key, format!("documents/{}/intro.pdf", id));
    }

    #[test]
    fn test_sanitize_strips_directories() {
        let id = Uuid::new_v4();
        assert!(document_key(id, "../../etc/passwd").ends_with("/passwd"));
        assert!(document_key(id, "C:\\temp\\notes.txt").ends_with("/notes.txt"));
    }

    #[test]
    fn test_sanitize_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("my file (1).pdf"), "my_file__1_.pdf");
    }

    #[test]
    fn test_sanitize_empty_and_dot_names() {
        assert_eq!(sanitize_filename(""), "unnamed");
        assert_eq!(sanitize_filename(".."), "unnamed");
    }
}
