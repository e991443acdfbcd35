//! PDF page extraction

use std::borrow::Cow;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::ExtractorConfig;
use crate::error::{Error, Result};
use crate::types::PageRecord;

/// Typographic characters PDF fonts commonly emit, with plain replacements
const TYPOGRAPHIC_REPLACEMENTS: &[(char, &str)] = &[
    ('\u{2010}', "-"),   // hyphen
    ('\u{2011}', "-"),   // non-breaking hyphen
    ('\u{2013}', "-"),   // en dash
    ('\u{2014}', "--"),  // em dash
    ('\u{2212}', "-"),   // minus sign
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2022}', "* "),  // bullet
    ('\u{2026}', "..."),
    ('\u{00A0}', " "),   // non-breaking space
    ('\u{00AD}', ""),    // soft hyphen
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Glyph names that leak out of PDF fonts: `uniXXXX` bare or wrapped in
/// `(..)`/`<..>`, and underscore ligature names only when wrapped
static GLYPH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\(uni([0-9A-F]{4})\)|<uni([0-9A-F]{4})>|uni([0-9A-F]{4})|[(<](f_f_i|f_f_l|f_f|f_i|f_l)[)>]",
    )
    .expect("Invalid regex")
});

/// Raw (page number, text) pairs before cleanup
type RawPages = Vec<(u32, String)>;

/// Extracts per-page text from PDF files
#[derive(Debug, Clone, Default)]
pub struct PdfLoader {
    config: ExtractorConfig,
}

impl PdfLoader {
    /// Create a new loader
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Load a PDF from disk, one record per page that has text
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<PageRecord>> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        check_extension(path)?;

        let source = source_name(path);
        let data = std::fs::read(path)?;
        self.extract(&source, &data)
    }

    /// Load a PDF already in memory. `filename` becomes the record source.
    pub fn load_mem(&self, filename: &str, data: &[u8]) -> Result<Vec<PageRecord>> {
        let path = Path::new(filename);
        check_extension(path)?;
        self.extract(&source_name(path), data)
    }

    fn extract(&self, source: &str, data: &[u8]) -> Result<Vec<PageRecord>> {
        let (opened, raw) = match lopdf::Document::load_mem(data) {
            Ok(doc) => (true, Self::extract_with_lopdf(&doc)),
            Err(e) => {
                tracing::warn!("lopdf could not open '{}': {}, trying fallback", source, e);
                (false, Vec::new())
            }
        };

        let raw = if raw.iter().any(|(_, text)| !text.trim().is_empty()) {
            raw
        } else {
            match self.extract_with_timeout(source, data) {
                Ok(pages) => pages,
                // An opened document with no text is image-only, not broken
                Err(e) if opened => {
                    tracing::warn!("No extractable text in '{}': {}", source, e);
                    Vec::new()
                }
                Err(e) => return Err(e),
            }
        };

        let pages: Vec<PageRecord> = raw
            .into_iter()
            .filter_map(|(page_number, text)| {
                let text = self.clean(&text);
                if text.is_empty() {
                    tracing::debug!("Skipping page {} of '{}': no text", page_number, source);
                    None
                } else {
                    Some(PageRecord::new(source, page_number, text))
                }
            })
            .collect();

        tracing::info!("Loaded {} pages from '{}'", pages.len(), source);
        Ok(pages)
    }

    fn extract_with_lopdf(doc: &lopdf::Document) -> RawPages {
        doc.get_pages()
            .into_keys()
            .map(|page_number| {
                let text = doc.extract_text(&[page_number]).unwrap_or_else(|e| {
                    tracing::debug!("Could not extract text for page {}: {}", page_number, e);
                    String::new()
                });
                (page_number, text)
            })
            .collect()
    }

    /// Run pdf-extract on a worker thread; some fonts make it hang or panic
    fn extract_with_timeout(&self, source: &str, data: &[u8]) -> Result<RawPages> {
        let data = data.to_vec();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem_by_pages(&data);
            let _ = tx.send(result);
        });

        let timeout = Duration::from_secs(self.config.extract_timeout_secs);
        match rx.recv_timeout(timeout) {
            Ok(Ok(pages)) => {
                let _ = handle.join();
                Ok((1u32..).zip(pages).collect())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(Error::file_parse(source, e.to_string()))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // The thread cannot be killed; it is left to finish on its own
                tracing::error!(
                    "PDF extraction of '{}' timed out after {}s",
                    source,
                    self.config.extract_timeout_secs
                );
                Err(Error::file_parse(
                    source,
                    format!("extraction timed out after {}s", self.config.extract_timeout_secs),
                ))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread crashed on '{}'", source);
                Err(Error::file_parse(source, "extraction thread crashed"))
            }
        }
    }

    fn clean(&self, text: &str) -> String {
        let text = text.replace('\0', "");
        let text = if self.config.normalize_glyphs {
            normalize_glyphs(&text)
        } else {
            text
        };
        text.trim().to_string()
    }
}

/// Decode leaked glyph names, then replace typographic characters with plain ASCII
pub fn normalize_glyphs(text: &str) -> String {
    let text = decode_glyph_names(text);
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match TYPOGRAPHIC_REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

fn decode_glyph_names(text: &str) -> Cow<'_, str> {
    GLYPH_NAME.replace_all(text, |caps: &Captures| {
        if let Some(hex) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) {
            // Surrogate code points are not chars; leave those names alone
            return u32::from_str_radix(hex.as_str(), 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string());
        }
        match &caps[4] {
            "f_f_i" => "ffi",
            "f_f_l" => "ffl",
            "f_f" => "ff",
            "f_i" => "fi",
            _ => "fl",
        }
        .to_string()
    })
}

fn check_extension(path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => Ok(()),
        Some(ext) => Err(Error::InvalidFormat(format!(".{}", ext))),
        None => Err(Error::InvalidFormat("(no extension)".to_string())),
    }
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Write a PDF with one Courier text line per page; "" makes a blank page
    pub(crate) fn write_pdf(path: &Path, pages: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let operations = if text.is_empty() {
                Vec::new()
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PdfLoader::default().load(dir.path().join("missing.pdf"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain text").unwrap();

        match PdfLoader::default().load(&path) {
            Err(Error::InvalidFormat(ext)) => assert_eq!(ext, ".txt"),
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert!(check_extension(Path::new("REPORT.PDF")).is_ok());
        assert!(check_extension(Path::new("a/b/report.pdf")).is_ok());
        assert!(matches!(
            check_extension(Path::new("README")),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_loads_pages_and_skips_blank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.pdf");
        write_pdf(&path, &["Hello first page", "", "Hello third page"]);

        let pages = PdfLoader::default().load(&path).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[1].page_number, 3);
        assert!(pages[0].text.contains("first"));
        assert!(pages[1].text.contains("third"));
        assert!(pages.iter().all(|p| p.source == "sample.pdf"));
        assert!(pages.iter().all(|p| p.text == p.text.trim()));
    }

    #[test]
    fn test_load_mem_uses_filename_as_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("on-disk.pdf");
        write_pdf(&path, &["Hello memory"]);
        let data = std::fs::read(&path).unwrap();

        let pages = PdfLoader::default().load_mem("uploads/report.pdf", &data).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].source, "report.pdf");

        assert!(matches!(
            PdfLoader::default().load_mem("report.docx", &data),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_corrupt_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let result = PdfLoader::default().load(&path);
        assert!(matches!(result, Err(Error::FileParse { .. })));
    }

    #[test]
    fn test_normalize_glyphs() {
        assert_eq!(
            normalize_glyphs("\u{201C}of\u{FB01}ce\u{201D} \u{2014} it\u{2019}s\u{2026}"),
            "\"office\" -- it's..."
        );
        assert_eq!(normalize_glyphs("plain"), "plain");
    }

    #[test]
    fn test_normalize_glyph_names() {
        assert_eq!(normalize_glyphs("it(uni2019)s"), "it's");
        assert_eq!(normalize_glyphs("a<uni00A0>b"), "a b");
        assert_eq!(normalize_glyphs("pages 1uni20142"), "pages 1--2");
        assert_eq!(normalize_glyphs("(f_i)nal <f_f_l>uent"), "final ffluent");
        // Ordinary words and identifiers are not glyph names
        assert_eq!(normalize_glyphs("unicode uniface buf_in fifty"), "unicode uniface buf_in fifty");
        assert_eq!(normalize_glyphs("(uniD800)"), "(uniD800)");
    }

    #[test]
    fn test_fallback_extracts_numbered_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fallback.pdf");
        write_pdf(&path, &["Hello first page", "", "Hello third page"]);
        let data = std::fs::read(&path).unwrap();

        let pages = PdfLoader::default()
            .extract_with_timeout("fallback.pdf", &data)
            .unwrap();

        let numbers: Vec<u32> = pages.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(pages[0].1.contains("first"));
        assert!(pages[1].1.trim().is_empty());
        assert!(pages[2].1.contains("third"));
    }

    #[test]
    fn test_fallback_failure_is_parse_error() {
        let loader = PdfLoader::new(ExtractorConfig {
            extract_timeout_secs: 0,
            ..ExtractorConfig::default()
        });

        // Either the engine rejects the bytes or the zero timeout fires first
        let result = loader.extract_with_timeout("broken.pdf", b"%PDF-1.4 truncated");
        match result {
            Err(Error::FileParse { filename, .. }) => assert_eq!(filename, "broken.pdf"),
            other => panic!("expected FileParse, got {:?}", other),
        }
    }

    #[test]
    fn test_clean_respects_config() {
        let loader = PdfLoader::new(ExtractorConfig {
            normalize_glyphs: false,
            ..ExtractorConfig::default()
        });
        assert_eq!(loader.clean("  a\u{2019}b\0 \n"), "a\u{2019}b");
        assert_eq!(PdfLoader::default().clean("  a\u{2019}b\0 \n"), "a'b");
    }
}
