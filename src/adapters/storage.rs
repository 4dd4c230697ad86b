use crate::domain::model::{OrderId, TrackingCollection};
use crate::domain::ports::OrderStore;
use crate::utils::error::{Result, TrackingError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

/// Process-local store, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<Mutex<HashMap<OrderId, TrackingCollection>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, order_id: OrderId, collection: TrackingCollection) {
        let mut orders = self.orders.lock().await;
        orders.insert(order_id, collection);
    }

    pub async fn order_count(&self) -> usize {
        self.orders.lock().await.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get(&self, order_id: &OrderId) -> Result<TrackingCollection> {
        let orders = self.orders.lock().await;
        Ok(orders.get(order_id).cloned().unwrap_or_default())
    }

    async fn put(&self, order_id: &OrderId, collection: &TrackingCollection) -> Result<()> {
        let mut orders = self.orders.lock().await;
        orders.insert(order_id.clone(), collection.clone());
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct OrderFile {
    #[serde(default)]
    orders: BTreeMap<OrderId, OrderRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OrderRecord {
    #[serde(default)]
    tracking_numbers: TrackingCollection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// All orders in one JSON document:
///
/// ```json
/// {"orders": {"1042": {"tracking_numbers": ["9400..."], "updated_at": "2026-01-01T00:00:00Z"}}}
/// ```
///
/// A missing file reads as an empty store. Each write goes to a uniquely named
/// temp file in the same directory and is renamed into place, so readers in any
/// process see either the old or the new document. Concurrent read-modify-write
/// from separate processes can still drop an update.
#[derive(Debug)]
pub struct JsonFileOrderStore {
    path: PathBuf,
    file_lock: Mutex<()>,
}

impl JsonFileOrderStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file_lock: Mutex::new(()),
        }
    }

    async fn read_file(&self) -> Result<OrderFile> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(OrderFile::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Order store {} not found, starting empty", self.path.display());
                Ok(OrderFile::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, file: &OrderFile) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir).await?;

        let data = serde_json::to_vec_pretty(file)?;
        let target = self.path.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            // 暫存檔必須和目標同目錄，rename 才是原子操作
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&data)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target)
                .map_err(|e| TrackingError::StorageError {
                    message: format!("cannot replace {}: {}", target.display(), e.error),
                })?;
            Ok(())
        })
        .await
        .map_err(|e| TrackingError::StorageError {
            message: format!("store write task failed: {}", e),
        })?
    }

    /// Updated-at timestamp of an order, if it was ever written.
    pub async fn updated_at(&self, order_id: &OrderId) -> Result<Option<DateTime<Utc>>> {
        let _guard = self.file_lock.lock().await;
        let file = self.read_file().await?;
        Ok(file.orders.get(order_id).and_then(|record| record.updated_at))
    }
}

#[async_trait]
impl OrderStore for JsonFileOrderStore {
    async fn get(&self, order_id: &OrderId) -> Result<TrackingCollection> {
        let _guard = self.file_lock.lock().await;
        let file = self.read_file().await?;
        Ok(file
            .orders
            .get(order_id)
            .map(|record| record.tracking_numbers.clone())
            .unwrap_or_default())
    }

    async fn put(&self, order_id: &OrderId, collection: &TrackingCollection) -> Result<()> {
        let _guard = self.file_lock.lock().await;
        let mut file = self.read_file().await?;
        file.orders.insert(
            order_id.clone(),
            OrderRecord {
                tracking_numbers: collection.clone(),
                updated_at: Some(Utc::now()),
            },
        );
        self.write_file(&file).await?;
        tracing::debug!(
            "💾 Saved {} tracking numbers for order {} to {}",
            collection.len(),
            order_id,
            self.path.display()
        );
        Ok(())
    }
}
