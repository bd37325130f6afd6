use std::sync::Arc;

use uuid::Uuid;

use super::{Company, CompanyError};
use crate::messaging::{Event, EventPublisher, EventType};
use crate::metrics::Metrics;
use crate::store::CompanyStore;

// ============================================================================
// Company Service - Write-Path Consistency Coordinator
// ============================================================================
//
// Every write is two steps against collaborators that share no transaction:
// persist to the record store, then publish the matching event to the bus.
// The store write goes first because it is the authoritative state for
// subsequent reads; the publish is the compensable second step. When the
// publish fails, one compensating store write restores the pre-operation
// state. When that compensation itself fails, the store and the event
// stream disagree and the call surfaces `CompanyError::Inconsistent`.
//
// No retry loop, no queue, no locking across operations on the same id:
// a failed call is returned to the caller after at most one compensation
// attempt, and same-id races resolve last-write-wins at the store.
//
// ============================================================================

pub struct CompanyService {
    store: Arc<dyn CompanyStore>,
    publisher: Arc<dyn EventPublisher>,
    metrics: Arc<Metrics>,
}

impl CompanyService {
    pub fn new(
        store: Arc<dyn CompanyStore>,
        publisher: Arc<dyn EventPublisher>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            store,
            publisher,
            metrics,
        }
    }

    /// Create a company and announce it on the bus.
    ///
    /// The incoming id is discarded; identity is assigned here. The name
    /// uniqueness pre-check is a read-then-write and therefore racy: two
    /// concurrent creates with the same name can both pass it. Known
    /// weakness, kept because hardening it changes observable behavior.
    pub async fn create(&self, mut company: Company) -> Result<Company, CompanyError> {
        company.id = Uuid::new_v4();

        let count = self
            .store
            .count_by_name(&company.name)
            .await
            .map_err(CompanyError::Store)?;
        if count > 0 {
            return Err(CompanyError::AlreadyExists(company.name));
        }

        self.store
            .create(&company)
            .await
            .map_err(CompanyError::Store)?;

        if let Err(publish_err) = self.publish(EventType::Create, &company).await {
            tracing::error!(
                company_id = %company.id,
                error = %publish_err,
                "company created but event publish failed, rolling back"
            );
            self.metrics.publish_failures.with_label_values(&["create"]).inc();

            if let Err(compensation_err) = self.store.delete(company.id).await {
                return Err(self.inconsistent("create", company.id, publish_err, compensation_err));
            }

            tracing::info!(company_id = %company.id, "create rollback succeeded");
            self.metrics.compensations.with_label_values(&["create"]).inc();
            return Err(CompanyError::Publish(publish_err));
        }

        self.metrics.operations.with_label_values(&["create"]).inc();
        Ok(company)
    }

    /// Read-through to the store. Absent is `Ok(None)`, not an error.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Company>, CompanyError> {
        self.store.get_by_id(id).await.map_err(CompanyError::Store)
    }

    /// Replace all mutable fields of an existing company in one call.
    /// The identifier in `new_values` is ignored.
    pub async fn update(&self, id: Uuid, mut new_values: Company) -> Result<Company, CompanyError> {
        let previous = self
            .store
            .get_by_id(id)
            .await
            .map_err(CompanyError::Store)?
            .ok_or(CompanyError::NotFound(id))?;

        new_values.id = previous.id;

        let updated = self
            .store
            .update(&new_values)
            .await
            .map_err(CompanyError::Store)?;

        if let Err(publish_err) = self.publish(EventType::Update, &updated).await {
            tracing::error!(
                company_id = %updated.id,
                error = %publish_err,
                "company updated but event publish failed, restoring previous state"
            );
            self.metrics.publish_failures.with_label_values(&["update"]).inc();

            if let Err(compensation_err) = self.store.update(&previous).await {
                return Err(self.inconsistent("update", id, publish_err, compensation_err));
            }

            tracing::info!(company_id = %previous.id, "update rollback succeeded");
            self.metrics.compensations.with_label_values(&["update"]).inc();
            return Err(CompanyError::Publish(publish_err));
        }

        self.metrics.operations.with_label_values(&["update"]).inc();
        Ok(updated)
    }

    /// Delete a company, announcing the entity as it stood before deletion.
    pub async fn delete(&self, id: Uuid) -> Result<(), CompanyError> {
        let existing = self
            .store
            .get_by_id(id)
            .await
            .map_err(CompanyError::Store)?
            .ok_or(CompanyError::NotFound(id))?;

        self.store.delete(id).await.map_err(CompanyError::Store)?;

        if let Err(publish_err) = self.publish(EventType::Delete, &existing).await {
            tracing::error!(
                company_id = %id,
                error = %publish_err,
                "company deleted but event publish failed, recreating record"
            );
            self.metrics.publish_failures.with_label_values(&["delete"]).inc();

            if let Err(compensation_err) = self.store.create(&existing).await {
                return Err(self.inconsistent("delete", id, publish_err, compensation_err));
            }

            tracing::info!(company_id = %id, "delete rollback succeeded");
            self.metrics.compensations.with_label_values(&["delete"]).inc();
            return Err(CompanyError::Publish(publish_err));
        }

        self.metrics.operations.with_label_values(&["delete"]).inc();
        Ok(())
    }

    async fn publish(&self, event_type: EventType, company: &Company) -> anyhow::Result<()> {
        let event = Event::new(event_type, company)?;
        self.publisher.publish(&event).await
    }

    fn inconsistent(
        &self,
        operation: &'static str,
        id: Uuid,
        publish_error: anyhow::Error,
        compensation_error: anyhow::Error,
    ) -> CompanyError {
        tracing::error!(
            operation,
            company_id = %id,
            publish_error = %publish_error,
            compensation_error = %compensation_error,
            "compensation failed, store and event stream now disagree"
        );
        self.metrics.inconsistent_state_total.inc();

        CompanyError::Inconsistent {
            operation,
            id,
            publish_error,
            compensation_error,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
