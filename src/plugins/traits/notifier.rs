use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::utils::error::Result;

/// One run's digest: the ranked top products and where the full report lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestEvent {
    pub products: Vec<Product>,
    pub generated_at: NaiveDateTime,
    pub report_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

/// Trait for implementing notification channels (Feishu, etc.)
#[async_trait]
pub trait NotifierPlugin: Send + Sync {
    /// Plugin metadata
    fn name(&self) -> &str;
    fn plugin_type(&self) -> &str;

    /// Deliver the digest. `Ok` with `success == false` means the endpoint
    /// answered but rejected the message; `Err` means it could not be reached.
    async fn notify(&self, event: &DigestEvent) -> Result<NotificationResult>;
}
