use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::config::FeishuConfig;
use crate::models::Product;
use crate::plugins::traits::{DigestEvent, NotificationResult, NotifierPlugin};
use crate::utils::error::Result;
use crate::utils::text::ellipsize;

/// Products listed in the card.
pub const CARD_PRODUCTS: usize = 3;
const CARD_NAME_CHARS: usize = 40;
const RANK_MARKERS: [&str; CARD_PRODUCTS] = ["1️⃣", "2️⃣", "3️⃣"];

const CARD_TITLE: &str = "🔥 海外爆款选品日报";
const LIST_HEADING: &str = "**📊 今日 TOP 3 精选**";
const BUTTON_TEXT: &str = "📊 查看完整报告";
const SOURCES_NOTE: &str = "数据来源: Amazon Movers & Shakers + Best Sellers";

/// Markdown block listing the first three products.
fn product_lines(products: &[Product]) -> String {
    products
        .iter()
        .zip(RANK_MARKERS)
        .map(|(product, marker)| {
            format!(
                "{} {}\n    {} | 📈 {}\n\n",
                marker,
                ellipsize(&product.name, CARD_NAME_CHARS),
                product.market_label(),
                product.growth
            )
        })
        .collect()
}

/// Build the interactive card message. Only the first three products are used.
pub fn build_card_payload(
    products: &[Product],
    generated_at: NaiveDateTime,
    report_url: &str,
) -> serde_json::Value {
    json!({
        "msg_type": "interactive",
        "card": {
            "config": {
                "wide_screen_mode": true
            },
            "header": {
                "template": "red",
                "title": {
                    "tag": "plain_text",
                    "content": CARD_TITLE
                }
            },
            "elements": [
                {
                    "tag": "div",
                    "text": {
                        "tag": "plain_text",
                        "content": format!("📅 {}", generated_at.format("%Y-%m-%d %H:%M"))
                    }
                },
                {
                    "tag": "hr"
                },
                {
                    "tag": "div",
                    "text": {
                        "tag": "lark_md",
                        "content": format!("{}\n\n{}", LIST_HEADING, product_lines(products))
                    }
                },
                {
                    "tag": "hr"
                },
                {
                    "tag": "action",
                    "actions": [
                        {
                            "tag": "button",
                            "text": {
                                "tag": "plain_text",
                                "content": BUTTON_TEXT
                            },
                            "type": "primary",
                            "url": report_url
                        }
                    ]
                },
                {
                    "tag": "note",
                    "elements": [
                        {
                            "tag": "plain_text",
                            "content": SOURCES_NOTE
                        }
                    ]
                }
            ]
        }
    })
}

/// The webhook reports success with a zero status in either of its two
/// status fields.
fn is_success_body(body: &serde_json::Value) -> bool {
    ["StatusCode", "code"]
        .iter()
        .any(|field| body.get(field).and_then(|v| v.as_i64()) == Some(0))
}

pub struct FeishuNotifier {
    client: Client,
    webhook_url: String,
}

impl FeishuNotifier {
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(FeishuNotifier {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    /// `None` when no webhook is configured.
    pub fn from_config(config: &FeishuConfig) -> Result<Option<Self>> {
        config
            .webhook_url
            .as_ref()
            .map(|url| Self::new(url.clone(), Duration::from_secs(config.timeout_secs)))
            .transpose()
    }
}

#[async_trait]
impl NotifierPlugin for FeishuNotifier {
    fn name(&self) -> &str {
        "Feishu Notifier"
    }

    fn plugin_type(&self) -> &str {
        "feishu"
    }

    async fn notify(&self, event: &DigestEvent) -> Result<NotificationResult> {
        let top = &event.products[..event.products.len().min(CARD_PRODUCTS)];
        let payload = build_card_payload(top, event.generated_at, &event.report_url);

        let response = self.client.post(&self.webhook_url).json(&payload).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(NotificationResult {
                success: false,
                message_id: None,
                error: Some(format!("HTTP {}", status.as_u16())),
            });
        }

        let body: serde_json::Value = response.json().await?;
        debug!(%body, "Feishu webhook response");

        if is_success_body(&body) {
            Ok(NotificationResult {
                success: true,
                message_id: body
                    .pointer("/data/message_id")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
                error: None,
            })
        } else {
            Ok(NotificationResult {
                success: false,
                message_id: None,
                error: Some(body.to_string()),
            })
        }
    }
}
