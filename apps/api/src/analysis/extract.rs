//! Text Extractor: raw uploaded bytes to a single lowercase text blob.
//!
//! PDF goes through `pdf-extract`, one page at a time. DOCX is a zip package;
//! paragraphs are read out of `word/document.xml` in document order.

use std::io::{Cursor, Read};
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::analysis::error::AnalysisError;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const DOCX_BODY_PART: &str = "word/document.xml";

/// One start, end, or empty-element tag. Declarations, comments, and
/// processing instructions do not match.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z_][\w.:-]*)(?:\s[^>]*?)?(/?)>").expect("tag pattern is valid")
});

/// Run-level containers whose text belongs to a separate story (text boxes,
/// shapes, embedded objects) rather than to the enclosing paragraph.
const DETACHED_CONTENT: &[&str] = &[
    "w:drawing",
    "w:pict",
    "w:object",
    "w:txbxContent",
    "mc:AlternateContent",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Pdf,
    Docx,
}

impl DocumentType {
    /// Resolves a declared MIME type. Parameters and ASCII case are ignored.
    pub fn from_mime(declared: &str) -> Result<Self, AnalysisError> {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            PDF_MIME => Ok(DocumentType::Pdf),
            DOCX_MIME => Ok(DocumentType::Docx),
            _ => Err(AnalysisError::UnsupportedFormat {
                declared: declared.to_string(),
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentType::Pdf => "PDF",
            DocumentType::Docx => "DOCX",
        }
    }
}

/// Lowercased text of one uploaded document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub document_type: DocumentType,
}

/// Extracts lowercase text from `bytes` according to the declared MIME type.
///
/// Fails outright rather than returning partial text.
pub fn extract_text(bytes: &[u8], declared_mime: &str) -> Result<ExtractedDocument, AnalysisError> {
    let document_type = DocumentType::from_mime(declared_mime)?;
    let raw = match document_type {
        DocumentType::Pdf => extract_pdf(bytes)?,
        DocumentType::Docx => extract_docx(bytes)?,
    };
    Ok(ExtractedDocument {
        text: raw.to_lowercase(),
        document_type,
    })
}

fn extract_pdf(bytes: &[u8]) -> Result<String, AnalysisError> {
    let kind = DocumentType::Pdf.label();
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| AnalysisError::extraction(kind, "parser aborted on malformed document"))?
    .map_err(|e| AnalysisError::extraction(kind, e.to_string()))?;

    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    Ok(text)
}

fn extract_docx(bytes: &[u8]) -> Result<String, AnalysisError> {
    let kind = DocumentType::Docx.label();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AnalysisError::extraction(kind, e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| AnalysisError::extraction(kind, format!("{DOCX_BODY_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| AnalysisError::extraction(kind, e.to_string()))?;

    Ok(docx_paragraphs(&xml)?
        .into_iter()
        .map(|p| p + "\n")
        .collect())
}

/// Paragraph texts of a WordprocessingML body, in document order.
///
/// Only runs of top-level paragraphs contribute. Paragraphs nested inside
/// text boxes or drawings are skipped along with the rest of that content.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, AnalysisError> {
    let kind = DocumentType::Docx.label();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut para_depth = 0usize;
    let mut run_depth = 0usize;
    let mut detached = 0usize;
    let mut in_text = false;
    let mut cursor = 0;

    for tag in TAG_RE.captures_iter(xml) {
        let Some(whole) = tag.get(0) else { continue };
        let collecting = para_depth == 1 && run_depth > 0 && detached == 0;
        if in_text && collecting {
            current.push_str(&unescape_xml(&xml[cursor..whole.start()]));
        }
        cursor = whole.end();

        let closing = !tag[1].is_empty();
        let empty = !tag[3].is_empty();
        match &tag[2] {
            "w:p" if empty => {
                if para_depth == 0 {
                    paragraphs.push(String::new());
                }
            }
            "w:p" if closing => {
                para_depth = para_depth
                    .checked_sub(1)
                    .ok_or_else(|| AnalysisError::extraction(kind, "unbalanced paragraph tags"))?;
                if para_depth == 0 {
                    paragraphs.push(std::mem::take(&mut current));
                }
            }
            "w:p" => para_depth += 1,
            "w:r" if !empty => {
                run_depth = if closing {
                    run_depth.saturating_sub(1)
                } else {
                    run_depth + 1
                };
            }
            "w:t" => in_text = !closing && !empty,
            "w:tab" if empty && collecting => current.push('\t'),
            "w:br" | "w:cr" if empty && collecting => current.push('\n'),
            name if !empty && DETACHED_CONTENT.contains(&name) => {
                detached = if closing {
                    detached.saturating_sub(1)
                } else {
                    detached + 1
                };
            }
            _ => {}
        }
    }

    if para_depth != 0 {
        return Err(AnalysisError::extraction(kind, "unterminated paragraph"));
    }
    Ok(paragraphs)
}

fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let Some(semi) = tail.find(';') else {
            out.push_str(tail);
            return out;
        };
        let entity = &tail[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .map(|hex| u32::from_str_radix(hex, 16).ok())
                .unwrap_or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
