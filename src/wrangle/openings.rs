use std::collections::HashMap;
use std::path::Path;
use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

pub const OPENING_REFERENCE_PATH: &str = "../data/Chess Opening Reference - Sheet1.csv";

// What Lichess writes in the ECO tag when no opening was recognised
pub const UNKNOWN_ECO: &str = "?";
pub const UNKNOWN_OPENING: &str = "Unknown";

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum OpeningError {
    #[error("ECO code `{0}` is not in the opening reference")]
    UnknownCode(String),
    #[error("ECO code `{0}` appears more than once in the opening reference")]
    DuplicateCode(String),
}

// ECO Code, Name
#[derive(Debug, Deserialize)]
struct OpeningRecord {
    #[serde(rename = "ECO Code")]
    eco_code: String,
    #[serde(rename = "Name")]
    name: String,
}

/// Maps ECO codes to human-readable opening names.
#[derive(Clone, Debug, Default)]
pub struct OpeningReference {
    names: HashMap<String, String>,
}

impl OpeningReference {
    pub fn from_path(path: &Path) -> Result<OpeningReference> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .from_path(path)
            .with_context(|| format!("Failed to open opening reference {}", path.display()))?;

        OpeningReference::from_reader(reader)
            .with_context(|| format!("Misformatted opening reference {}", path.display()))
    }

    pub fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<OpeningReference> {
        let mut reference = OpeningReference::default();

        for record in reader.deserialize::<OpeningRecord>() {
            let record: OpeningRecord = record?;
            reference.insert(record.eco_code, record.name)?;
        }

        if reference.is_empty() {
            log::warn!("Opening reference has no entries, only `?` codes can be resolved");
        } else {
            log::debug!("Loaded {} openings", reference.len());
        }
        Ok(reference)
    }

    pub fn insert(&mut self, eco_code: String, name: String) -> Result<(), OpeningError> {
        if self.names.contains_key(&eco_code) {
            return Err(OpeningError::DuplicateCode(eco_code));
        }

        self.names.insert(eco_code, name);
        Ok(())
    }

    /// Resolves an ECO code, treating `?` as an unrecognised opening.
    pub fn name(&self, eco_code: &str) -> Result<&str, OpeningError> {
        if eco_code == UNKNOWN_ECO {
            return Ok(UNKNOWN_OPENING);
        }

        self.names
            .get(eco_code)
            .map(|x| x.as_str())
            .ok_or_else(|| OpeningError::UnknownCode(eco_code.to_string()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
fn reference_from_str(data: &str) -> Result<OpeningReference> {
    OpeningReference::from_reader(csv::Reader::from_reader(data.as_bytes()))
}

#[test]
fn check_lookup() {
    let reference = reference_from_str("ECO Code,Name\nB01,Scandinavian Defense\nC50,Italian Game\n").unwrap();

    assert_eq!(reference.len(), 2);
    assert_eq!(reference.name("C50"), Ok("Italian Game"));
    assert_eq!(reference.name("?"), Ok(UNKNOWN_OPENING));
    assert_eq!(reference.name("E99"), Err(OpeningError::UnknownCode("E99".to_string())));
}

#[test]
fn check_duplicate_code_is_rejected() {
    let result = reference_from_str("ECO Code,Name\nB01,Scandinavian Defense\nB01,Center Counter\n");

    let error = result.unwrap_err();
    assert_eq!(
        error.downcast_ref::<OpeningError>(),
        Some(&OpeningError::DuplicateCode("B01".to_string()))
    );
}

#[test]
fn check_missing_columns_fail() {
    assert!(reference_from_str("Code,Opening\nB01,Scandinavian Defense\n").is_err());
}

#[test]
fn check_empty_reference() {
    let reference = reference_from_str("ECO Code,Name\n").unwrap();

    assert!(reference.is_empty());
    assert_eq!(reference.name("?"), Ok(UNKNOWN_OPENING));
}
