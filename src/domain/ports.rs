use crate::domain::model::{Action, Caller, OrderId, TrackingCollection};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Backing storage for the tracking collection of each order.
///
/// An order that never had tracking numbers yields an empty collection.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get(&self, order_id: &OrderId) -> Result<TrackingCollection>;
    async fn put(&self, order_id: &OrderId, collection: &TrackingCollection) -> Result<()>;
}

pub trait AuthorizationGate: Send + Sync {
    fn is_authorized(&self, caller: &Caller, action: Action) -> bool;
}

/// The slice of an order record this crate is allowed to touch.
#[async_trait]
pub trait Order: Send + Sync {
    fn id(&self) -> &OrderId;
    fn tracking_numbers(&self) -> &TrackingCollection;
    fn set_tracking_numbers(&mut self, numbers: TrackingCollection);
    async fn save(&self) -> Result<()>;
}
