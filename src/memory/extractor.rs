//! Entity extraction from memory plaintext
//!
//! Runs once at write time, before the content is sealed. The extracted
//! entities are stored in the clear next to the ciphertext so that search
//! can match keywords without opening the payload. Extraction is
//! deterministic rule-based scanning, deliberately non-exhaustive: emails,
//! URLs, and dates.

use regex::Regex;

use super::types::ExtractedEntities;
use crate::error::{Error, Result};

const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";
const URL_PATTERN: &str = r"https?://[^\s]+";
// ISO 8601 dates and the loose slash form (3/15/2026, 03/15/26)
const DATE_PATTERN: &str = r"\b\d{4}-\d{2}-\d{2}\b|\b\d{1,2}/\d{1,2}/\d{2,4}\b";

/// Rule-based extractor with patterns compiled once at construction
pub struct EntityExtractor {
    email: Regex,
    url: Regex,
    date: Regex,
}

impl EntityExtractor {
    /// Compile the extraction patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            email: compile(EMAIL_PATTERN)?,
            url: compile(URL_PATTERN)?,
            date: compile(DATE_PATTERN)?,
        })
    }

    /// Extract entities from plaintext
    ///
    /// Returns empty lists when nothing matches. Duplicates are dropped,
    /// keeping the first occurrence order.
    pub fn extract(&self, text: &str) -> ExtractedEntities {
        ExtractedEntities {
            emails: collect_unique(&self.email, text),
            urls: collect_unique(&self.url, text),
            dates: collect_unique(&self.date, text),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| Error::Extraction(format!("Invalid pattern '{}': {}", pattern, e)))
}

fn collect_unique(regex: &Regex, text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for m in regex.find_iter(text) {
        let found = m.as_str().to_string();
        if !out.contains(&found) {
            out.push(found);
        }
    }
    out
}
