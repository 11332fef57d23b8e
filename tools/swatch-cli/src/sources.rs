//! Local collaborators: product files on disk and an order sink backed by the cache.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swatch_cache::{cache_key, Cache, FileBackend};
use swatch_commerce::catalog::ProductDetail;
use swatch_commerce::checkout::{OrderPayload, OrderSubmitter};
use swatch_commerce::selection::ProductSource;
use swatch_commerce::{CommerceError, OrderId, ProductId};

/// Reads `<dir>/<product-id>.json` product detail files.
#[derive(Debug, Clone)]
pub struct FileProductSource {
    dir: PathBuf,
}

impl FileProductSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, product_id: &ProductId) -> PathBuf {
        self.dir.join(format!("{product_id}.json"))
    }
}

#[async_trait]
impl ProductSource for FileProductSource {
    async fn fetch_product(
        &self,
        product_id: &ProductId,
    ) -> Result<ProductDetail, CommerceError> {
        let path = self.path_for(product_id);
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            CommerceError::Upstream(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| CommerceError::Upstream(format!("invalid product file {}: {e}", path.display())))
    }
}

/// What the order sink keeps for each accepted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub payload: OrderPayload,
}

/// Accepts orders by writing a receipt under `order:<id>`.
pub struct LocalOrderSink {
    cache: Mutex<Cache<FileBackend>>,
}

impl LocalOrderSink {
    pub fn new(cache: Cache<FileBackend>) -> Self {
        Self {
            cache: Mutex::new(cache),
        }
    }

    /// Look up a stored receipt.
    pub fn receipt(&self, order_id: &OrderId) -> Result<Option<OrderReceipt>, CommerceError> {
        let cache = self
            .cache
            .lock()
            .map_err(|_| CommerceError::Upstream("order sink lock poisoned".into()))?;
        Ok(cache.get(&cache_key!("order", order_id))?)
    }
}

#[async_trait]
impl OrderSubmitter for LocalOrderSink {
    async fn submit(&self, payload: &OrderPayload) -> Result<OrderId, CommerceError> {
        let receipt = OrderReceipt {
            order_id: OrderId::generate(),
            placed_at: Utc::now(),
            payload: payload.clone(),
        };

        let mut cache = self
            .cache
            .lock()
            .map_err(|_| CommerceError::Upstream("order sink lock poisoned".into()))?;
        cache
            .set(&cache_key!("order", receipt.order_id), &receipt)
            .map_err(|e| CommerceError::Upstream(format!("cannot store order: {e}")))?;

        tracing::debug!(order_id = %receipt.order_id, "order receipt stored");
        Ok(receipt.order_id)
    }
}
