use std::path::Path;

use crate::forms::FormError;

/// Text of a user-selected document. Only `.txt` files are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentText {
    name: String,
    text: String,
}

pub fn is_txt(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}

impl DocumentText {
    /// Decode uploaded bytes the way a browser reads a file as text: a
    /// leading UTF-8 BOM is dropped and invalid UTF-8 is replaced.
    pub fn from_bytes(file_name: &str, bytes: &[u8]) -> Result<Self, FormError> {
        if !is_txt(file_name) {
            return Err(FormError::UnsupportedFile(file_name.to_string()));
        }
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        Ok(Self {
            name: file_name.to_string(),
            text: String::from_utf8_lossy(bytes).into_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_extension_is_case_insensitive() {
        assert!(is_txt("case.txt"));
        assert!(is_txt("CASE.TXT"));
        assert!(!is_txt("case.pdf"));
        assert!(!is_txt("case.docx"));
        assert!(!is_txt("txt"));
        assert!(!is_txt(""));
    }

    #[test]
    fn from_bytes_keeps_exact_text() {
        let body = "Plaintiff alleges breach.\r\n\tSecond line § ünïcode\n";
        let doc = DocumentText::from_bytes("brief.txt", body.as_bytes()).unwrap();
        assert_eq!(doc.text(), body);
        assert_eq!(doc.name(), "brief.txt");
    }

    #[test]
    fn from_bytes_replaces_invalid_utf8() {
        let doc = DocumentText::from_bytes("a.txt", &[b'o', b'k', 0xff]).unwrap();
        assert_eq!(doc.text(), "ok\u{fffd}");
    }

    #[test]
    fn from_bytes_rejects_non_txt() {
        let err = DocumentText::from_bytes("brief.pdf", b"%PDF").unwrap_err();
        assert!(matches!(err, FormError::UnsupportedFile(ref n) if n == "brief.pdf"));
    }

    #[test]
    fn from_bytes_drops_leading_bom() {
        let doc = DocumentText::from_bytes("bom.txt", b"\xEF\xBB\xBFSection 1").unwrap();
        assert_eq!(doc.text(), "Section 1");
    }

    #[test]
    fn from_bytes_keeps_bom_after_start() {
        let doc = DocumentText::from_bytes("bom.txt", b"a\xEF\xBB\xBFb").unwrap();
        assert_eq!(doc.text(), "a\u{feff}b");
    }
}
