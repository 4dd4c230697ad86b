// Adapters layer: concrete implementations of the domain ports (storage, authorization).

pub mod auth;
pub mod storage;

pub use auth::RoleGate;
pub use storage::{InMemoryOrderStore, JsonFileOrderStore};
