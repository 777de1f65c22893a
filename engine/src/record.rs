//! History records captured from a change log.

use crate::{error::Result, Document, Error};
use serde::{Deserialize, Serialize};

/// A recorded change event: where it came from and where it sits in that
/// source's log, optionally carrying the DDL that was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Identifies the origin of the change (server, database, instance)
    source: Document,
    /// Location within the source's log (file/offset, LSN, transaction id)
    position: Document,
    /// Database the DDL applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    database_name: Option<String>,
    /// DDL statements recorded at this position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ddl: Option<String>,
}

impl HistoryRecord {
    /// Create a record that only marks a position.
    pub fn new(source: Document, position: Document) -> Self {
        Self {
            source,
            position,
            database_name: None,
            ddl: None,
        }
    }

    /// Create a record carrying DDL applied to a database.
    pub fn with_ddl(
        source: Document,
        position: Document,
        database_name: impl Into<String>,
        ddl: impl Into<String>,
    ) -> Self {
        Self {
            source,
            position,
            database_name: Some(database_name.into()),
            ddl: Some(ddl.into()),
        }
    }

    pub fn source(&self) -> &Document {
        &self.source
    }

    pub fn position(&self) -> &Document {
        &self.position
    }

    pub fn database_name(&self) -> Option<&str> {
        self.database_name.as_deref()
    }

    pub fn ddl(&self) -> Option<&str> {
        self.ddl.as_deref()
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidRecord(e.to_string()))
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidRecord(e.to_string()))
    }
}
