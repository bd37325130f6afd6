use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Company Entity
// ============================================================================

/// Legal form of a company. Closed set; no free-form values are accepted.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompanyType {
    Corporation,
    NonProfit,
    Cooperative,
    SoleProprietorship,
}

impl CompanyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyType::Corporation => "Corporation",
            CompanyType::NonProfit => "NonProfit",
            CompanyType::Cooperative => "Cooperative",
            CompanyType::SoleProprietorship => "SoleProprietorship",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Corporation" => Some(CompanyType::Corporation),
            "NonProfit" => Some(CompanyType::NonProfit),
            "Cooperative" => Some(CompanyType::Cooperative),
            "SoleProprietorship" => Some(CompanyType::SoleProprietorship),
            _ => None,
        }
    }
}

/// The managed resource. The identifier is assigned by the coordinator at
/// creation time and is never taken from a caller.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub employees: i32,
    pub registered: bool,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}
