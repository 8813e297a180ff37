//! Document handles supplied by the caller

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Declared format of a codebook document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// HTML codebook pages
    Html,
    /// PDF codebooks
    Pdf,
    /// Plain text layouts
    Text,
    /// CSV variable listings
    Csv,
}

impl DocumentFormat {
    /// Get the format name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Html => "html",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Text => "text",
            DocumentFormat::Csv => "csv",
        }
    }

    /// Parse a format from a name (internal use)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Some(DocumentFormat::Html),
            "pdf" => Some(DocumentFormat::Pdf),
            "text" | "txt" => Some(DocumentFormat::Text),
            "csv" => Some(DocumentFormat::Csv),
            _ => None,
        }
    }

    /// Infer the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }
}

impl std::str::FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unsupported document format: {}", s))
    }
}

/// Where a document's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBody {
    /// Read from the filesystem when extracted
    Path(PathBuf),
    /// Already in memory
    Inline(Vec<u8>),
}

/// A document to mine, tagged with its format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    /// Provenance identifier copied into every record (usually the file name)
    pub source_id: String,

    /// Declared format; selects the extractor
    pub format: DocumentFormat,

    /// Document contents or location
    pub body: DocumentBody,

    /// CSV only: restrict the keyword scan to these header names
    pub columns: Option<Vec<String>>,
}

impl DocumentHandle {
    /// Create a handle for a file on disk with an explicit format
    ///
    /// The source id is the file name, matching how codebook listings cite files.
    pub fn from_path(path: impl Into<PathBuf>, format: DocumentFormat) -> Self {
        let path = path.into();
        let source_id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            source_id,
            format,
            body: DocumentBody::Path(path),
            columns: None,
        }
    }

    /// Create a handle for a file, inferring the format from its extension
    pub fn detect(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path)?;
        Some(Self::from_path(path, format))
    }

    /// Create a handle for in-memory content
    pub fn inline(source_id: impl Into<String>, format: DocumentFormat, content: impl Into<Vec<u8>>) -> Self {
        Self {
            source_id: source_id.into(),
            format,
            body: DocumentBody::Inline(content.into()),
            columns: None,
        }
    }

    /// Restrict a CSV scan to the named columns
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }
}
