//! Comparator configuration.
//!
//! Lets the component that wires up recovery choose a comparator from
//! configuration instead of code:
//!
//! ```json
//! {"position": {"strategy": "fieldOrder", "fields": ["lsn", "txId"]}}
//! ```

use crate::{
    comparator::{FieldOrderComparator, RecordComparator, DEFAULT_COMPARATOR},
    error::Result,
    Error,
};
use serde::{Deserialize, Serialize};

/// How positions are compared.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "camelCase")]
pub enum PositionStrategy {
    /// Compare the fields both positions share, in recorded order (default)
    #[default]
    SimilarFields,
    /// Compare the listed fields, most significant first
    FieldOrder { fields: Vec<String> },
}

/// Configuration for building a [`RecordComparator`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComparatorConfig {
    pub position: PositionStrategy,
}

impl ComparatorConfig {
    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Validate the configuration and build the comparator it describes.
    pub fn build(&self) -> Result<Box<dyn RecordComparator>> {
        match &self.position {
            PositionStrategy::SimilarFields => Ok(Box::new(DEFAULT_COMPARATOR)),
            PositionStrategy::FieldOrder { fields } => {
                if fields.is_empty() {
                    return Err(Error::InvalidConfig(
                        "fieldOrder strategy requires at least one field".into(),
                    ));
                }
                if let Some(blank) = fields.iter().find(|f| f.trim().is_empty()) {
                    return Err(Error::InvalidConfig(format!(
                        "invalid field name '{blank}'"
                    )));
                }
                tracing::debug!(fields = ?fields, "using field order position comparator");
                Ok(Box::new(FieldOrderComparator::new(fields.iter().cloned())))
            }
        }
    }
}
