pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;

pub use crate::adapters::{InMemoryOrderStore, JsonFileOrderStore, RoleGate};
pub use crate::config::AppConfig;
pub use crate::core::{
    carrier::CarrierProfile, dispatch::Dispatcher, manager::TrackingCollectionManager,
    service::TrackingService,
};
pub use crate::domain::model::{BulkAddResult, Caller, OrderId, TrackingCollection, TrackingView};
pub use crate::utils::error::{ErrorKind, Result, TrackingError};
