// ============================================================================
// Record Store - Persistence Collaborator
// ============================================================================
//
// Durable keyed storage for entities. Gives single-row durability only;
// there is no multi-row transaction and no coordination with the event bus.
// The coordinator owns all lifecycle logic on top of these primitives.
//
// ============================================================================

mod company_store;
pub mod memory;

pub use company_store::ScyllaCompanyStore;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::company::Company;

#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn create(&self, company: &Company) -> Result<()>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Company>>;
    async fn update(&self, company: &Company) -> Result<Company>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn count_by_name(&self, name: &str) -> Result<i64>;
}
