use crate::domain::model::{OrderId, TrackingCollection};
use crate::domain::ports::{Order, OrderStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// An order snapshot read from an [`OrderStore`], written back on `save`.
pub struct StoredOrder {
    id: OrderId,
    numbers: TrackingCollection,
    store: Arc<dyn OrderStore>,
}

impl StoredOrder {
    pub async fn load(store: Arc<dyn OrderStore>, id: OrderId) -> Result<Self> {
        let numbers = store.get(&id).await?;
        tracing::debug!("Loaded order {} with {} tracking numbers", id, numbers.len());
        Ok(Self { id, numbers, store })
    }
}

#[async_trait]
impl Order for StoredOrder {
    fn id(&self) -> &OrderId {
        &self.id
    }

    fn tracking_numbers(&self) -> &TrackingCollection {
        &self.numbers
    }

    fn set_tracking_numbers(&mut self, numbers: TrackingCollection) {
        self.numbers = numbers;
    }

    async fn save(&self) -> Result<()> {
        self.store.put(&self.id, &self.numbers).await
    }
}
