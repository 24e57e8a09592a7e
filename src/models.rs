mod embedding;
mod record;
mod result;

pub use embedding::EmbeddingTable;
pub use record::NodeRecord;
pub use result::{CurrentParent, SuggestedParent, ValidationResult, ValidationStatus, Verdict};
