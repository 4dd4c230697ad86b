use crate::core::manager::TrackingCollectionManager;
use crate::core::order::StoredOrder;
use crate::domain::model::{Action, BulkAddResult, Caller, OrderId, TrackingView};
use crate::domain::ports::{AuthorizationGate, Order, OrderStore};
use crate::utils::error::{Result, TrackingError};
use std::sync::Arc;

/// Request-level operations: authorize, load the order, apply the manager,
/// persist on success.
///
/// Each call is one read-modify-write against the store. Two callers editing
/// the same order at once can overwrite each other; delete-by-index can then hit
/// a different entry than the one the caller saw.
pub struct TrackingService {
    manager: TrackingCollectionManager,
    store: Arc<dyn OrderStore>,
    gate: Arc<dyn AuthorizationGate>,
}

impl TrackingService {
    pub fn new(
        manager: TrackingCollectionManager,
        store: Arc<dyn OrderStore>,
        gate: Arc<dyn AuthorizationGate>,
    ) -> Self {
        Self {
            manager,
            store,
            gate,
        }
    }

    fn authorize(&self, caller: &Caller, action: Action) -> Result<()> {
        if self.gate.is_authorized(caller, action) {
            return Ok(());
        }
        tracing::warn!("🚫 {} denied for caller {}", action, caller.id);
        Err(TrackingError::Unauthorized {
            caller: caller.id.clone(),
            action: action.name().to_string(),
        })
    }

    async fn open(&self, order_id: &OrderId) -> Result<StoredOrder> {
        StoredOrder::load(self.store.clone(), order_id.clone()).await
    }

    /// Returns the number as stored (normalized).
    pub async fn add_one(&self, caller: &Caller, order_id: &OrderId, raw: &str) -> Result<String> {
        self.authorize(caller, Action::AddOne)?;
        let mut order = self.open(order_id).await?;

        let updated = self
            .manager
            .add_one(order.tracking_numbers().clone(), raw)?;
        let number = updated
            .as_slice()
            .last()
            .cloned()
            .unwrap_or_default();

        order.set_tracking_numbers(updated);
        order.save().await?;

        tracing::info!("✅ Added tracking number {} to order {}", number, order_id);
        Ok(number)
    }

    pub async fn add_bulk(
        &self,
        caller: &Caller,
        order_id: &OrderId,
        raw: &str,
    ) -> Result<BulkAddResult> {
        self.authorize(caller, Action::AddBulk)?;
        let mut order = self.open(order_id).await?;

        let (updated, result) = self
            .manager
            .add_bulk(order.tracking_numbers().clone(), raw)?;

        // 整批只寫入一次；沒有新增就不寫
        if result.added > 0 {
            order.set_tracking_numbers(updated);
            order.save().await?;
        }

        tracing::info!(
            "📦 Bulk add on order {}: added={}, skipped={}, invalid={}",
            order_id,
            result.added,
            result.skipped,
            result.invalid
        );
        Ok(result)
    }

    pub async fn delete_at(&self, caller: &Caller, order_id: &OrderId, index: i64) -> Result<()> {
        self.authorize(caller, Action::DeleteAt)?;
        let mut order = self.open(order_id).await?;

        let updated = self
            .manager
            .delete_at(order.tracking_numbers().clone(), index)?;
        order.set_tracking_numbers(updated);
        order.save().await?;

        tracing::info!("🗑️ Deleted tracking number at index {} from order {}", index, order_id);
        Ok(())
    }

    pub async fn list(&self, caller: &Caller, order_id: &OrderId) -> Result<Vec<TrackingView>> {
        self.authorize(caller, Action::List)?;
        let order = self.open(order_id).await?;
        let carrier = self.manager.carrier();

        let views = TrackingCollectionManager::list(order.tracking_numbers())
            .into_iter()
            .map(|entry| TrackingView {
                tracking_url: carrier.tracking_url(&entry.number),
                service: carrier
                    .describe(&TrackingCollectionManager::normalize(&entry.number))
                    .map(str::to_string),
                index: entry.index,
                number: entry.number,
            })
            .collect();
        Ok(views)
    }
}
