//! Draft domain models.
//!
//! A [`Draft`] is one generated or edited version of the content. Drafts are
//! plain values: once placed into history they are never mutated, edits
//! produce a new value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A subject/body pair produced by generation or manual editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// The subject line.
    pub subject: String,
    /// The body content.
    pub body: String,
}

impl Draft {
    /// Creates a new draft.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Reference records returned alongside the first draft of a session.
///
/// Purely informational. Every record is kept as the opaque JSON value the
/// service returned; missing records deserialize as `null`. Records are read
/// under the service's snake_case names and written in camelCase, like the
/// rest of the workflow projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct RetrievedContext {
    #[serde(default)]
    pub crm_lead: Value,
    #[serde(default)]
    pub crm_stage: Value,
    #[serde(default)]
    pub res_users: Value,
    #[serde(default)]
    pub res_partner: Value,
    #[serde(default)]
    pub organization: Value,
}

impl RetrievedContext {
    /// Returns the records paired with a display title, in display order.
    pub fn sections(&self) -> [(&'static str, &Value); 5] {
        [
            ("Lead Info (crm_lead)", &self.crm_lead),
            ("Stage Info (crm_stage)", &self.crm_stage),
            ("User Info (res_users)", &self.res_users),
            ("User Contact (res_partner)", &self.res_partner),
            ("Company Info (organization)", &self.organization),
        ]
    }

    /// Returns true if the service returned no records at all.
    pub fn is_empty(&self) -> bool {
        self.sections().iter().all(|(_, value)| value.is_null())
    }
}

/// Form inputs used to start a new generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInputs {
    pub lead_id: String,
    pub user_id: String,
    /// Optional free-text instructions; empty means none.
    #[serde(default)]
    pub instructions: String,
}

impl GenerationInputs {
    pub fn new(
        lead_id: impl Into<String>,
        user_id: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            lead_id: lead_id.into(),
            user_id: user_id.into(),
            instructions: instructions.into(),
        }
    }
}
