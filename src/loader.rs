//! Document loading and text normalization
//!
//! Turns a file of a supported type into plain text. Dispatch is by file
//! extension: `.txt`/`.md` are read raw, `.pdf` is per-page extracted text,
//! `.docx` is per-paragraph text. Anything else fails with
//! [`RagError::UnsupportedFormat`] naming the extension.

use crate::error::{RagError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Load a file into raw text based on its extension.
pub fn load_document(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "txt" | "md" => std::fs::read_to_string(path).map_err(|e| RagError::Io {
            source: e,
            context: format!("Failed to read {}", path.display()),
        }),
        "pdf" => load_pdf(path),
        "docx" => load_docx(path),
        _ => Err(RagError::UnsupportedFormat { extension }),
    }
}

fn load_pdf(path: &Path) -> Result<String> {
    // pdf-extract concatenates the extracted text of every page.
    pdf_extract::extract_text(path).map_err(|e| RagError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn load_docx(path: &Path) -> Result<String> {
    let data = std::fs::read(path).map_err(|e| RagError::Io {
        source: e,
        context: format!("Failed to read {}", path.display()),
    })?;

    let docx = docx_rs::read_docx(&data).map_err(|e| RagError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut paragraphs = Vec::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(text) = child {
                            line.push_str(&text.text);
                        }
                    }
                }
            }
            paragraphs.push(line);
        }
    }

    Ok(paragraphs.join("\n"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn special_chars_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s.,!?-]").expect("static regex"))
}

fn space_before_punct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+([.,!?])").expect("static regex"))
}

/// Normalize loaded text before chunking: collapse whitespace runs to
/// single spaces, replace characters outside word/whitespace/basic
/// punctuation with a space, and drop spacing immediately before
/// punctuation.
///
/// This is lossy on purpose: layout is discarded, and non-Latin scripts
/// or numerics mixed with symbols may be mangled. Accepted tradeoff for a
/// retrieval corpus of prose documents.
pub fn normalize_text(text: &str) -> String {
    let collapsed = whitespace_re().replace_all(text, " ");
    let collapsed = collapsed.trim();
    let stripped = special_chars_re().replace_all(collapsed, " ");
    space_before_punct_re()
        .replace_all(&stripped, "$1")
        .into_owned()
}
