// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Chainfeed

//! # API Data Models
//!
//! Request and response data structures for the Chainfeed backend. All types
//! derive `Serialize`/`Deserialize` for JSON handling.
//!
//! ## Wallet Address Type
//!
//! The [`WalletAddress`] newtype wraps Ethereum-style addresses (0x-prefixed,
//! 40 hex characters). Every authenticated call passes it as the account key.
//!
//! ## One-Time Secret
//!
//! [`CreatedApiKey`] is the only type carrying the key secret. The listing
//! type [`ApiKeyMetadata`] has no secret field at all, so the
//! reveal-exactly-once rule is enforced by shape rather than by an optional
//! field that callers could forget to clear.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Ethereum-compatible wallet address wrapper.
///
/// Provides type safety for the account identifier threaded through every
/// authenticated call. Format: `0x` followed by 40 hexadecimal characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(pub String);

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// News Models
// =============================================================================

/// A single news item from the feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    /// Unique identifier for this item.
    pub id: String,
    /// Token the item is tagged with (e.g. "bitcoin").
    pub token_id: String,
    /// Publication timestamp.
    pub timestamp: DateTime<Utc>,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Source references backing the item.
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Filter and pagination parameters for the news feed.
///
/// `None` fields are omitted from the query string; ordering is
/// server-determined (typically recency-descending).
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewsQuery {
    /// Restrict the feed to one token identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    /// Maximum number of items to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Number of items to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl NewsQuery {
    /// Query for a single token's news.
    pub fn for_token(token_id: impl Into<String>) -> Self {
        Self {
            token_id: Some(token_id.into()),
            ..Self::default()
        }
    }
}

// =============================================================================
// API Key Models
// =============================================================================

/// Non-secret descriptive fields of an API key, as returned by the listing
/// operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKeyMetadata {
    /// Unique identifier for this key.
    pub id: String,
    /// User-chosen display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A freshly created API key, including the secret value.
///
/// The `key` field is communicated exactly once, in this response. The
/// backend never returns it again; callers must show or store it immediately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedApiKey {
    /// Unique identifier for this key.
    pub id: String,
    /// User-chosen display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// The one-time-revealed secret value (e.g. `sk_live_...`).
    pub key: String,
}

impl CreatedApiKey {
    /// Drop the secret, keeping only the fields the listing operation shows.
    pub fn into_metadata(self) -> ApiKeyMetadata {
        ApiKeyMetadata {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
        }
    }
}

/// Request body for key creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApiKeyRequest {
    /// Display name for the new key.
    pub name: String,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The wallet address to authenticate or register.
    pub address: WalletAddress,
    /// The challenge message that was signed.
    pub message: String,
    /// Hex-encoded signature over `message`.
    pub signature: String,
}

/// Backend confirmation of a login or first-time registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfirmation {
    /// The authenticated wallet address.
    pub address: WalletAddress,
    /// True if this call registered a new account.
    #[serde(default)]
    pub registered: bool,
}

// =============================================================================
// Billing Models
// =============================================================================

/// Remaining credit count for an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreditBalance {
    /// Backend-tracked units of API usage allowance.
    pub credits: u64,
}

/// Aggregate usage for an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageReport {
    /// Total API requests recorded against this account.
    pub total_requests: u64,
    /// Plan tier label (e.g. "free", "pro").
    pub plan: String,
}

/// Request body for `POST /billing/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    /// The paying wallet address.
    pub user_address: WalletAddress,
    /// Hash of the on-chain transfer to the treasury address.
    pub tx_hash: String,
}

/// Backend confirmation that a top-up transaction was matched and credited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentConfirmation {
    /// The verified transaction hash.
    pub tx_hash: String,
    /// Credit balance after crediting the payment.
    pub credits: u64,
}
