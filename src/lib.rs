pub mod dataset;
pub mod embedder;
pub mod models;
pub mod ranker;
pub mod report;
pub mod similarity;
pub mod validator;

pub use dataset::load_records;
pub use models::{
    CurrentParent, EmbeddingTable, NodeRecord, SuggestedParent, ValidationResult, ValidationStatus,
    Verdict,
};
pub use validator::{RelationshipValidator, ValidatorConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validator_accessible_from_crate_root() {
        let validator = RelationshipValidator::new(Vec::new(), EmbeddingTable::default());
        assert!(validator.is_ok());
    }

    #[test]
    fn types_accessible_from_crate_root() {
        let record = NodeRecord {
            root_key: "K1".to_string(),
            parent_name: "Parent".to_string(),
            ..Default::default()
        };
        assert!(record.has_parent());

        let verdict = Verdict::Valid;
        assert_eq!(format!("{}", verdict), "VALID");
        assert_eq!(verdict.status(), ValidationStatus::Pass);

        let config = ValidatorConfig::default();
        assert_eq!(config.max_suggestions, 3);
        assert_eq!(config.validity_threshold, 0.65);
        assert_eq!(config.suggestion_threshold, 0.65);
    }
}
