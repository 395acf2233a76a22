//! Tenant / knowledge base scope

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Maximum length for tenant and knowledge base identifiers
pub const MAX_SCOPE_ID_LENGTH: usize = 128;

/// The (tenant, knowledge base) pair that isolates all stored data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    tenant_id: String,
    kb_id: String,
}

impl Scope {
    /// Build a scope from raw identifiers, trimming surrounding whitespace
    pub fn new(tenant_id: &str, kb_id: &str) -> Result<Self, DomainError> {
        Ok(Self {
            tenant_id: validate_scope_id("tenantId", tenant_id)?,
            kb_id: validate_scope_id("kbId", kb_id)?,
        })
    }

    /// Build a scope from optional request fields
    pub fn from_optional(
        tenant_id: Option<&str>,
        kb_id: Option<&str>,
    ) -> Result<Self, DomainError> {
        Self::new(tenant_id.unwrap_or_default(), kb_id.unwrap_or_default())
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn kb_id(&self) -> &str {
        &self.kb_id
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant_id, self.kb_id)
    }
}

fn validate_scope_id(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(DomainError::bad_request(format!("{} is required", field)));
    }

    if trimmed.chars().count() > MAX_SCOPE_ID_LENGTH {
        return Err(DomainError::bad_request(format!(
            "{} too long (max {} characters)",
            field, MAX_SCOPE_ID_LENGTH
        )));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(DomainError::bad_request(format!(
            "{} contains control characters",
            field
        )));
    }

    Ok(trimmed.to_string())
}
