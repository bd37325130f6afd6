use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use super::CompanyStore;
use crate::domain::company::Company;

/// In-memory store backend, used by the test suite and for local
/// development without a ScyllaDB node.
#[derive(Default)]
pub struct MemoryCompanyStore {
    rows: Mutex<HashMap<Uuid, Company>>,
}

impl MemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompanyStore for MemoryCompanyStore {
    async fn create(&self, company: &Company) -> Result<()> {
        self.rows
            .lock()
            .expect("rows lock poisoned")
            .insert(company.id, company.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Company>> {
        Ok(self.rows.lock().expect("rows lock poisoned").get(&id).cloned())
    }

    async fn update(&self, company: &Company) -> Result<Company> {
        self.rows
            .lock()
            .expect("rows lock poisoned")
            .insert(company.id, company.clone());
        Ok(company.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.rows.lock().expect("rows lock poisoned").remove(&id);
        Ok(())
    }

    async fn count_by_name(&self, name: &str) -> Result<i64> {
        let count = self
            .rows
            .lock()
            .expect("rows lock poisoned")
            .values()
            .filter(|c| c.name == name)
            .count();
        Ok(count as i64)
    }
}
