//! # Notification Dispatch
//!
//! Quote requests, newsletter signups and chat messages from the site fan
//! out to the shop's inboxes: a transactional email API and the WhatsApp
//! Cloud API. Delivery is attempted exactly once per channel per
//! submission.
//!
//! ## Contract
//!
//! - Required fields are checked here, before anything leaves the process.
//!   A miss is the caller's 400, no channel is touched.
//! - A channel failure is logged and collapsed into a `false` success
//!   flag. The underlying error never propagates to the HTTP surface and
//!   nothing is retried or queued.
//! - Channels without credentials in the environment are simply absent. A
//!   submission with no configured channel at all reports failure, the
//!   message would otherwise vanish silently.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::{EmailConfig, WhatsAppConfig};
use crate::error::AppError;
use crate::utils::require;

/// Quote form payload. Name, email and quantity are required, the rest
/// rides along into the notification body.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub quantity: Option<u32>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub product: Option<String>,
    pub message: Option<String>,
}

/// One formatted outbound message, channel-agnostic.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, message: &Outbound) -> Result<()>;
}

pub struct EmailChannel {
    client: Client,
    config: EmailConfig,
}

#[async_trait]
impl Channel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, message: &Outbound) -> Result<()> {
        let payload = json!({
            "from": self.config.from,
            "to": self.config.to,
            "subject": message.subject,
            "text": message.body,
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("email api returned {}", response.status()));
        }

        Ok(())
    }
}

pub struct WhatsAppChannel {
    client: Client,
    config: WhatsAppConfig,
}

#[async_trait]
impl Channel for WhatsAppChannel {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    async fn send(&self, message: &Outbound) -> Result<()> {
        let url = format!("{}/{}/messages", self.config.api_url, self.config.phone_id);
        let payload = json!({
            "messaging_product": "whatsapp",
            "to": self.config.recipient,
            "type": "text",
            "text": { "body": format!("{}\n\n{}", message.subject, message.body) },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("whatsapp api returned {}", response.status()));
        }

        Ok(())
    }
}

pub struct Dispatcher {
    email: Option<EmailChannel>,
    whatsapp: Option<WhatsAppChannel>,
}

impl Dispatcher {
    pub fn new(email: Option<EmailConfig>, whatsapp: Option<WhatsAppConfig>) -> Self {
        let client = Client::new();

        Self {
            email: email.map(|config| EmailChannel {
                client: client.clone(),
                config,
            }),
            whatsapp: whatsapp.map(|config| WhatsAppChannel { client, config }),
        }
    }

    /// Quote requests go to every configured channel.
    pub async fn quote(&self, request: &QuoteRequest) -> Result<bool, AppError> {
        let name = require(request.name.as_deref())?;
        let email = require(request.email.as_deref())?;
        let quantity = request.quantity.ok_or(AppError::MissingFields)?;

        info!(%name, %email, quantity, "quote request received");

        Ok(self
            .broadcast(&quote_message(name, email, quantity, request))
            .await)
    }

    /// Newsletter signups only notify the shop inbox.
    pub async fn newsletter(&self, email: Option<&str>) -> Result<bool, AppError> {
        let email = require(email)?;

        info!(%email, "newsletter signup received");

        Ok(self.email_only(&newsletter_message(email)).await)
    }

    /// Chat escalations go to every configured channel.
    pub async fn chat(&self, message: Option<&str>) -> Result<bool, AppError> {
        let message = require(message)?;

        info!("chat message received");

        Ok(self.broadcast(&chat_message(message)).await)
    }

    async fn broadcast(&self, message: &Outbound) -> bool {
        let mut attempted = false;
        let mut delivered = true;

        if let Some(channel) = &self.email {
            attempted = true;
            delivered &= attempt(channel, message).await;
        }
        if let Some(channel) = &self.whatsapp {
            attempted = true;
            delivered &= attempt(channel, message).await;
        }

        if !attempted {
            warn!("no notification channel configured, message dropped");
            return false;
        }

        delivered
    }

    async fn email_only(&self, message: &Outbound) -> bool {
        match &self.email {
            Some(channel) => attempt(channel, message).await,
            None => {
                warn!("no email channel configured, message dropped");
                false
            }
        }
    }
}

async fn attempt(channel: &dyn Channel, message: &Outbound) -> bool {
    match channel.send(message).await {
        Ok(()) => {
            info!(channel = channel.name(), "notification sent");
            true
        }
        Err(e) => {
            error!(channel = channel.name(), error = %e, "notification failed");
            false
        }
    }
}

fn quote_message(name: &str, email: &str, quantity: u32, request: &QuoteRequest) -> Outbound {
    let mut lines = vec![
        format!("Name: {name}"),
        format!("Email: {email}"),
        format!("Quantity: {quantity}"),
    ];

    if let Some(phone) = request.phone.as_deref() {
        lines.push(format!("Phone: {phone}"));
    }
    if let Some(company) = request.company.as_deref() {
        lines.push(format!("Company: {company}"));
    }
    if let Some(product) = request.product.as_deref() {
        lines.push(format!("Product: {product}"));
    }
    if let Some(message) = request.message.as_deref() {
        lines.push(format!("Message: {message}"));
    }
    lines.push(format!("Received: {}", timestamp()));

    Outbound {
        subject: format!("New quote request from {name}"),
        body: lines.join("\n"),
    }
}

fn newsletter_message(email: &str) -> Outbound {
    Outbound {
        subject: "New newsletter signup".to_string(),
        body: format!("Email: {email}\nReceived: {}", timestamp()),
    }
}

fn chat_message(message: &str) -> Outbound {
    Outbound {
        subject: "New chat message from the site".to_string(),
        body: format!("{message}\n\nReceived: {}", timestamp()),
    }
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}
