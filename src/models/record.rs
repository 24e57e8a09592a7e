use serde::{Deserialize, Serialize};

/// One entry of the input hierarchy.
///
/// Every field defaults to an empty string when absent from the source data,
/// so a partially filled record deserializes cleanly instead of failing the
/// whole dataset. `parent_key` also accepts the misspelled `parnet_key` field
/// name found in legacy exports; only the canonical spelling is ever written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(default)]
    pub root_key: String,
    #[serde(default)]
    pub root_name: String,
    #[serde(default)]
    pub root_description: String,
    #[serde(default, alias = "parnet_key")]
    pub parent_key: String,
    #[serde(default)]
    pub parent_name: String,
    #[serde(default)]
    pub parent_short_summary: String,
}

impl NodeRecord {
    /// Returns true when the record declares a parent.
    ///
    /// Records without a declared parent are skipped by validation and are
    /// never eligible as suggested parents for other records.
    pub fn has_parent(&self) -> bool {
        !self.parent_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty_strings() {
        let record: NodeRecord = serde_json::from_str(r#"{"root_key": "K1"}"#).unwrap();

        assert_eq!(record.root_key, "K1");
        assert_eq!(record.root_name, "");
        assert_eq!(record.parent_name, "");
        assert!(!record.has_parent());
    }

    #[test]
    fn legacy_misspelled_parent_key_is_accepted() {
        let record: NodeRecord =
            serde_json::from_str(r#"{"root_key": "K1", "parnet_key": "P9"}"#).unwrap();

        assert_eq!(record.parent_key, "P9");
    }

    #[test]
    fn canonical_parent_key_is_accepted() {
        let record: NodeRecord =
            serde_json::from_str(r#"{"root_key": "K1", "parent_key": "P9"}"#).unwrap();

        assert_eq!(record.parent_key, "P9");
    }

    #[test]
    fn serialization_emits_canonical_field_name_only() {
        let record = NodeRecord {
            root_key: "K1".to_string(),
            parent_key: "P9".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"parent_key\""));
        assert!(!json.contains("parnet_key"));
    }

    #[test]
    fn has_parent_requires_nonempty_parent_name() {
        let mut record = NodeRecord::default();
        assert!(!record.has_parent());

        record.parent_name = "Networking".to_string();
        assert!(record.has_parent());
    }
}
