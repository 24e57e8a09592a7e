//! Loading of the input hierarchy dataset.
//!
//! The dataset is a JSON array of record objects. Absent fields on a record
//! are tolerated (they default to empty strings); only structural problems
//! with the file itself are errors.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::models::NodeRecord;

/// Errors raised while loading the dataset file.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be read.
    #[error("failed to read dataset file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("dataset file {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The top-level JSON value is not an array of records.
    #[error("dataset file {path}: input data must be a JSON array")]
    NotAnArray { path: String },
}

/// Loads the record sequence from a JSON file.
///
/// # Errors
///
/// Returns [`DatasetError`] when the file is unreadable, is not valid JSON,
/// or its top-level value is not an array. Individual records never fail:
/// missing fields deserialize as empty strings.
pub fn load_records(path: &Path) -> Result<Vec<NodeRecord>, DatasetError> {
    let display = path.display().to_string();

    let raw = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: display.clone(),
        source,
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| DatasetError::Parse {
            path: display.clone(),
            source,
        })?;

    if !value.is_array() {
        return Err(DatasetError::NotAnArray { path: display });
    }

    serde_json::from_value(value).map_err(|source| DatasetError::Parse {
        path: display,
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_dataset(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("failed to write dataset");
        file
    }

    #[test]
    fn loads_well_formed_dataset() {
        let file = write_dataset(
            r#"[
                {
                    "root_key": "K1",
                    "root_name": "Firewalls",
                    "root_description": "Packet filtering appliances",
                    "parent_key": "P1",
                    "parent_name": "Network Security",
                    "parent_short_summary": "Protecting networks from intrusion"
                }
            ]"#,
        );

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].root_key, "K1");
        assert_eq!(records[0].parent_name, "Network Security");
        assert!(records[0].has_parent());
    }

    #[test]
    fn tolerates_records_with_missing_fields() {
        let file = write_dataset(r#"[{"root_key": "K1"}, {}]"#);

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].root_key, "K1");
        assert_eq!(records[1].root_key, "");
        assert!(!records[1].has_parent());
    }

    #[test]
    fn accepts_legacy_misspelled_parent_key() {
        let file = write_dataset(r#"[{"root_key": "K1", "parnet_key": "P7"}]"#);

        let records = load_records(file.path()).unwrap();
        assert_eq!(records[0].parent_key, "P7");
    }

    #[test]
    fn empty_array_is_a_valid_dataset() {
        let file = write_dataset("[]");
        let records = load_records(file.path()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn non_array_top_level_is_rejected() {
        let file = write_dataset(r#"{"root_key": "K1"}"#);

        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::NotAnArray { .. }));
        assert!(err.to_string().contains("must be a JSON array"));
    }

    #[test]
    fn invalid_json_is_a_parse_error_naming_the_file() {
        let file = write_dataset("not json at all");

        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn missing_file_is_an_io_error_naming_the_path() {
        let err = load_records(Path::new("/nonexistent/dataset.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/dataset.json"));
    }
}
