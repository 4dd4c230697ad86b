pub mod carrier;
pub mod dispatch;
pub mod manager;
pub mod order;
pub mod render;
pub mod service;

pub use crate::domain::model::{BulkAddResult, OrderId, TrackingCollection, TrackingEntry};
pub use crate::domain::ports::{AuthorizationGate, Order, OrderStore};
pub use crate::utils::error::Result;
