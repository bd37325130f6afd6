use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use scylla::client::session::Session;
use uuid::Uuid;

use super::CompanyStore;
use crate::domain::company::{Company, CompanyType};

// ============================================================================
// ScyllaDB Company Store
// ============================================================================

pub struct ScyllaCompanyStore {
    session: Arc<Session>,
}

/// Row shape of the companies table, in column order.
type CompanyRow = (Uuid, String, Option<String>, i32, bool, String);

impl ScyllaCompanyStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Create the companies table and the secondary index backing
    /// `count_by_name` (name is not part of the primary key).
    pub async fn ensure_schema(&self) -> Result<()> {
        self.session
            .query_unpaged(
                "CREATE TABLE IF NOT EXISTS companies (
                    id uuid PRIMARY KEY,
                    name text,
                    description text,
                    employees int,
                    registered boolean,
                    type text
                )",
                &[],
            )
            .await?;

        self.session
            .query_unpaged(
                "CREATE INDEX IF NOT EXISTS companies_by_name ON companies (name)",
                &[],
            )
            .await?;

        Ok(())
    }
}

fn row_to_company(row: CompanyRow) -> Result<Company> {
    let (id, name, description, employees, registered, type_name) = row;
    let company_type = CompanyType::parse(&type_name)
        .ok_or_else(|| anyhow!("unknown company type in store: {}", type_name))?;

    Ok(Company {
        id,
        name,
        description,
        employees,
        registered,
        company_type,
    })
}

#[async_trait]
impl CompanyStore for ScyllaCompanyStore {
    async fn create(&self, company: &Company) -> Result<()> {
        self.session
            .query_unpaged(
                "INSERT INTO companies (id, name, description, employees, registered, type)
                 VALUES (?, ?, ?, ?, ?, ?)",
                (
                    company.id,
                    company.name.as_str(),
                    company.description.as_deref(),
                    company.employees,
                    company.registered,
                    company.company_type.as_str(),
                ),
            )
            .await?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Company>> {
        let result = self
            .session
            .query_unpaged(
                "SELECT id, name, description, employees, registered, type
                 FROM companies WHERE id = ?",
                (id,),
            )
            .await?;

        let rows = result.into_rows_result()?;
        match rows.maybe_first_row::<CompanyRow>()? {
            Some(row) => Ok(Some(row_to_company(row)?)),
            None => {
                tracing::debug!(company_id = %id, "company not found in store");
                Ok(None)
            }
        }
    }

    async fn update(&self, company: &Company) -> Result<Company> {
        self.session
            .query_unpaged(
                "UPDATE companies
                 SET name = ?, description = ?, employees = ?, registered = ?, type = ?
                 WHERE id = ?",
                (
                    company.name.as_str(),
                    company.description.as_deref(),
                    company.employees,
                    company.registered,
                    company.company_type.as_str(),
                    company.id,
                ),
            )
            .await?;

        // Read back so callers see the row exactly as persisted.
        self.get_by_id(company.id)
            .await?
            .ok_or_else(|| anyhow!("company {} missing after update", company.id))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.session
            .query_unpaged("DELETE FROM companies WHERE id = ?", (id,))
            .await?;

        Ok(())
    }

    async fn count_by_name(&self, name: &str) -> Result<i64> {
        let result = self
            .session
            .query_unpaged("SELECT COUNT(*) FROM companies WHERE name = ?", (name,))
            .await?;

        let rows = result.into_rows_result()?;
        let count = rows
            .maybe_first_row::<(i64,)>()?
            .map(|(count,)| count)
            .unwrap_or(0);
        Ok(count)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
//
// Store round-trips against a live ScyllaDB node are integration territory;
// only the row mapping is unit-testable here.
//
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_maps_onto_company() {
        let id = Uuid::new_v4();
        let row: CompanyRow = (
            id,
            "Acme".to_string(),
            Some("widgets".to_string()),
            42,
            true,
            "NonProfit".to_string(),
        );

        let company = row_to_company(row).unwrap();
        assert_eq!(company.id, id);
        assert_eq!(company.name, "Acme");
        assert_eq!(company.description.as_deref(), Some("widgets"));
        assert_eq!(company.employees, 42);
        assert!(company.registered);
        assert_eq!(company.company_type, CompanyType::NonProfit);
    }

    #[test]
    fn unknown_type_column_is_an_error() {
        let row: CompanyRow = (
            Uuid::new_v4(),
            "Acme".to_string(),
            None,
            1,
            false,
            "Partnership".to_string(),
        );

        let err = row_to_company(row).unwrap_err();
        assert!(err.to_string().contains("Partnership"));
    }
}
