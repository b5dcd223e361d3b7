use crate::error::Result;
use serde::Serialize;

/// Cloud API rejects text bodies longer than this; longer messages are sent
/// as consecutive chunks.
pub const MAX_MESSAGE_LEN: usize = 4096;

#[derive(Debug, Clone, Serialize)]
pub struct SendReceipt {
    pub message_id: String,
}

/// Outbound messaging seam. The store never touches the network; callers
/// send through this trait and then append the message to the lead's
/// history themselves.
pub trait MessageTransport {
    fn send_text(&self, to_phone: &str, body: &str) -> Result<SendReceipt>;
}

/// Splits on character boundaries into chunks of at most `limit` chars.
pub fn split_message(body: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in body.chars() {
        if count == limit {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(feature = "whatsapp-send")]
mod cloud {
    use super::{split_message, MessageTransport, SendReceipt, MAX_MESSAGE_LEN};
    use crate::error::{Result, SyncError};

    const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v21.0";

    /// WhatsApp Business Cloud API client (blocking).
    pub struct CloudApiTransport {
        phone_number_id: String,
        access_token: String,
        base_url: String,
        client: reqwest::blocking::Client,
    }

    impl CloudApiTransport {
        pub fn new(
            phone_number_id: impl Into<String>,
            access_token: impl Into<String>,
        ) -> Result<Self> {
            let phone_number_id = phone_number_id.into();
            let access_token = access_token.into();
            if phone_number_id.is_empty() || access_token.is_empty() {
                return Err(SyncError::Unavailable(
                    "whatsapp credentials not configured".to_string(),
                ));
            }
            Ok(Self {
                phone_number_id,
                access_token,
                base_url: DEFAULT_BASE_URL.to_string(),
                client: reqwest::blocking::Client::new(),
            })
        }

        pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
            self.base_url = base_url.into();
            self
        }

        fn post_text(&self, to_phone: &str, chunk: &str) -> Result<String> {
            let url = format!(
                "{}/{}/messages",
                self.base_url.trim_end_matches('/'),
                self.phone_number_id
            );
            let body = serde_json::json!({
                "messaging_product": "whatsapp",
                "to": to_phone,
                "type": "text",
                "text": { "body": chunk },
            });

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.access_token)
                .json(&body)
                .send()?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(SyncError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let payload: serde_json::Value = response.json()?;
            let message_id = payload["messages"][0]["id"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            Ok(message_id)
        }
    }

    impl MessageTransport for CloudApiTransport {
        fn send_text(&self, to_phone: &str, body: &str) -> Result<SendReceipt> {
            let mut message_id = String::new();
            for chunk in split_message(body, MAX_MESSAGE_LEN) {
                message_id = self.post_text(to_phone, &chunk)?;
            }
            Ok(SendReceipt { message_id })
        }
    }
}

#[cfg(feature = "whatsapp-send")]
pub use cloud::CloudApiTransport;
