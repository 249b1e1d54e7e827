use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// Resource a meter tracks. Informational only: the billing math is
/// identical for every resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
pub enum ResourceType {
    #[serde(rename = "electricity")]
    Electricity,

    #[serde(rename = "water")]
    Water,

    #[serde(rename = "heat")]
    Heat,
}

impl Default for ResourceType {
    fn default() -> Self {
        ResourceType::Electricity
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceType::Electricity => write!(f, "electricity"),
            ResourceType::Water => write!(f, "water"),
            ResourceType::Heat => write!(f, "heat"),
        }
    }
}

impl std::str::FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "electricity" => Ok(ResourceType::Electricity),
            "water" => Ok(ResourceType::Water),
            "heat" => Ok(ResourceType::Heat),
            _ => Err(format!("Invalid resource type: {}", s)),
        }
    }
}

/// A utility consumption point belonging to one tenant.
///
/// `subtract_from` marks this meter as a submeter of another meter: under the
/// strict-subtraction deduction policy its consumption is removed from the
/// parent's billable total. The column is nulled when the parent is deleted,
/// which intentionally leaves historical invoices as stored amounts only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meter {
    /// Unique meter ID (UUID)
    pub id: String,

    /// Owning tenant
    pub tenant_id: String,

    /// Display name, e.g. "Office" or "Warehouse"
    pub name: String,

    pub resource_type: ResourceType,

    /// Parent meter whose billable consumption this meter deducts from
    pub subtract_from: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meter {
    /// Create a new meter with validation
    pub fn new(
        tenant_id: impl Into<String>,
        name: impl Into<String>,
        resource_type: ResourceType,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::validation("Meter name must not be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.into(),
            name,
            resource_type,
            subtract_from: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Mark this meter as a submeter of `parent_id`
    pub fn with_subtract_from(mut self, parent_id: impl Into<String>) -> Self {
        self.subtract_from = Some(parent_id.into());
        self
    }
}
