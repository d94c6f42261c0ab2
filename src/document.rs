//! Plain-text extraction for uploaded documents.
//!
//! Only `txt`, `pdf` and `docx` are accepted. The type is decided from the file extension before
//! any bytes are looked at; parsing itself is left to `pdf-extract` and `docx-rs`.

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Extensions accepted by the upload filter.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["txt", "pdf", "docx"];

/// Errors raised while loading a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File extension is not one of [`SUPPORTED_EXTENSIONS`].
    #[error("Unsupported file type '{0}': expected one of txt, pdf, docx")]
    UnsupportedType(String),
    /// File content could not be turned into text.
    #[error("Failed to decode {kind} document: {reason}")]
    Decode {
        /// Declared document type.
        kind: DocumentKind,
        /// Library error description.
        reason: String,
    },
    /// File could not be read from disk.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that was requested.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Declared type of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Plain UTF-8 text.
    Text,
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word-processing document.
    Docx,
}

impl DocumentKind {
    /// Resolve a kind from a bare extension such as `"PDF"` or `".docx"`.
    pub fn from_extension(extension: &str) -> Result<Self, DocumentError> {
        let normalized = extension.trim().trim_start_matches('.').to_lowercase();
        match normalized.as_str() {
            "txt" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(DocumentError::UnsupportedType(normalized)),
        }
    }

    /// Resolve a kind from a file name's extension.
    pub fn from_file_name(name: &str) -> Result<Self, DocumentError> {
        let extension = Path::new(name)
            .extension()
            .and_then(|value| value.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }

    /// Canonical extension for this kind.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Extract plain text from `bytes` according to `kind`.
pub fn load_document(kind: DocumentKind, bytes: &[u8]) -> Result<String, DocumentError> {
    let text = match kind {
        DocumentKind::Text => decode_text(bytes)?,
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes).map_err(|error| {
            DocumentError::Decode {
                kind,
                reason: error.to_string(),
            }
        })?,
        DocumentKind::Docx => extract_docx(bytes)?,
    };
    tracing::debug!(
        %kind,
        bytes = bytes.len(),
        chars = text.chars().count(),
        "Document loaded"
    );
    Ok(text)
}

/// Read a document from disk, rejecting unsupported extensions before reading.
pub fn load_path(path: &Path) -> Result<(DocumentKind, String), DocumentError> {
    let name = path.to_string_lossy();
    let kind = DocumentKind::from_file_name(&name)?;
    let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
        path: name.to_string(),
        source,
    })?;
    Ok((kind, load_document(kind, &bytes)?))
}

fn decode_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|error| DocumentError::Decode {
        kind: DocumentKind::Text,
        reason: error.to_string(),
    })
}

fn extract_docx(bytes: &[u8]) -> Result<String, DocumentError> {
    let docx = docx_rs::read_docx(bytes).map_err(|error| DocumentError::Decode {
        kind: DocumentKind::Docx,
        reason: error.to_string(),
    })?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
            DocumentChild::Table(table) => collect_table(table, &mut lines),
            _ => {}
        }
    }
    Ok(lines.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_paragraph_children(&paragraph.children, &mut text);
    text
}

fn push_paragraph_children(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(value) => text.push_str(&value.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, text),
            _ => {}
        }
    }
}

fn collect_table(table: &Table, lines: &mut Vec<String>) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
                    TableCellContent::Table(nested) => collect_table(nested, lines),
                    _ => {}
                }
            }
        }
    }
}
