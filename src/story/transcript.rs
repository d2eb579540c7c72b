/// Story transcript: the append-only list of paragraphs for one session.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered story paragraphs. Grows by appending during a session and is
/// cleared when a new session starts. Stored on disk as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    paragraphs: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph verbatim.
    pub fn append(&mut self, paragraph: impl Into<String>) {
        self.paragraphs.push(paragraph.into());
    }

    pub fn reset(&mut self) {
        self.paragraphs.clear();
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn last(&self) -> Option<&str> {
        self.paragraphs.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// The whole story as one text, paragraphs separated by blank lines.
    pub fn to_text(&self) -> String {
        self.paragraphs.join("\n\n")
    }

    /// Load a transcript from JSON. A missing file is an empty transcript.
    pub fn load(path: &Path) -> Result<Self, TranscriptError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), TranscriptError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
