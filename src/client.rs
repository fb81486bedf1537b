// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Chainfeed

//! # Gateway Client
//!
//! Typed request layer over the Chainfeed backend. Each operation issues
//! exactly one network request and returns a decoded result or a
//! [`GatewayError`]; there are no retries and no caching here.
//!
//! ## Identity
//!
//! Authenticated calls pass the caller's wallet address as a `user_address`
//! query parameter. That is the contract the backend currently exposes and a
//! known trust-boundary weakness; the remediation path is a real proof from
//! an [`IdentityVerifier`](crate::identity::IdentityVerifier) at login,
//! exchanged server-side for a session credential.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::identity::IdentityVerifier;
use crate::models::{
    ApiKeyMetadata, CreateApiKeyRequest, CreatedApiKey, CreditBalance, LoginRequest, NewsItem,
    NewsQuery, PaymentConfirmation, SessionConfirmation, UsageReport, VerifyPaymentRequest,
    WalletAddress,
};

/// Client for the Chainfeed backend.
///
/// Cheap to clone; all clones share one connection pool. Concurrent calls
/// are independent and unordered relative to each other.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct RootMessage {
    message: String,
}

impl GatewayClient {
    /// Build a client from the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let _: url::Url = config.base_url.parse().map_err(|e: url::ParseError| {
            GatewayError::Validation(format!("invalid base URL `{}`: {e}", config.base_url))
        })?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url,
            http,
        })
    }

    /// Build a client from `NEWS_API_URL` and friends.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(GatewayConfig::from_env())
    }

    /// The configured backend base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Backend liveness message from `GET /`.
    pub async fn health(&self) -> Result<String, GatewayError> {
        let root: RootMessage = self
            .expect_json(self.http.get(self.url("/")), "GET /")
            .await?;
        Ok(root.message)
    }

    /// Fetch news items, optionally filtered and paginated.
    ///
    /// Ordering is server-determined, typically recency-descending.
    pub async fn list_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>, GatewayError> {
        debug!(token_id = ?query.token_id, "fetching news feed");
        self.expect_json(self.http.get(self.url("/news")).query(query), "GET /news")
            .await
    }

    /// Authenticate (or first-time register) a wallet address with the given
    /// proof of control.
    pub async fn login(
        &self,
        address: &WalletAddress,
        message: &str,
        signature: &str,
    ) -> Result<SessionConfirmation, GatewayError> {
        debug!(%address, "logging in");
        let body = LoginRequest {
            address: address.clone(),
            message: message.to_string(),
            signature: signature.to_string(),
        };
        self.expect_json(
            self.http.post(self.url("/auth/login")).json(&body),
            "POST /auth/login",
        )
        .await
    }

    /// Obtain a proof from `verifier` and log in with it.
    pub async fn ensure_identity(
        &self,
        address: &WalletAddress,
        verifier: &dyn IdentityVerifier,
    ) -> Result<SessionConfirmation, GatewayError> {
        let proof = verifier
            .prove(address)
            .map_err(|e| GatewayError::Auth(e.to_string()))?;
        self.login(address, &proof.message, &proof.signature).await
    }

    /// List key metadata for an account. Secrets are never included.
    pub async fn list_api_keys(
        &self,
        address: &WalletAddress,
    ) -> Result<Vec<ApiKeyMetadata>, GatewayError> {
        self.expect_json(
            self.http
                .get(self.url("/api-keys"))
                .query(&[("user_address", address.0.as_str())]),
            "GET /api-keys",
        )
        .await
    }

    /// Create a new API key.
    ///
    /// The response carries the secret value exactly once; it cannot be
    /// re-fetched afterwards. An empty or whitespace-only name fails with
    /// [`GatewayError::Validation`] before any request is issued.
    pub async fn create_api_key(
        &self,
        address: &WalletAddress,
        name: &str,
    ) -> Result<CreatedApiKey, GatewayError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GatewayError::Validation(
                "API key name must not be empty".to_string(),
            ));
        }

        debug!(%address, name, "creating API key");
        self.expect_json(
            self.http
                .post(self.url("/api-keys"))
                .query(&[("user_address", address.0.as_str())])
                .json(&CreateApiKeyRequest {
                    name: name.to_string(),
                }),
            "POST /api-keys",
        )
        .await
    }

    /// Revoke an API key by id.
    ///
    /// Revoking an unknown or already-revoked id yields
    /// [`GatewayError::NotFound`].
    pub async fn revoke_api_key(
        &self,
        address: &WalletAddress,
        key_id: &str,
    ) -> Result<(), GatewayError> {
        debug!(%address, key_id, "revoking API key");
        let context = "DELETE /api-keys/{id}";
        let response = self
            .http
            .delete(self.url(&format!("/api-keys/{key_id}")))
            .query(&[("user_address", address.0.as_str())])
            .send()
            .await
            .map_err(|e| GatewayError::from_transport(e, context))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::from_status(status, body, context));
        }
        Ok(())
    }

    /// Current credit balance for an account.
    pub async fn get_balance(&self, address: &WalletAddress) -> Result<CreditBalance, GatewayError> {
        self.expect_json(
            self.http
                .get(self.url("/billing/balance"))
                .query(&[("user_address", address.0.as_str())]),
            "GET /billing/balance",
        )
        .await
    }

    /// Aggregate request count and plan tier for an account.
    pub async fn get_usage(&self, address: &WalletAddress) -> Result<UsageReport, GatewayError> {
        self.expect_json(
            self.http
                .get(self.url("/billing/usage"))
                .query(&[("user_address", address.0.as_str())]),
            "GET /billing/usage",
        )
        .await
    }

    /// Submit an on-chain top-up transaction hash for verification and
    /// crediting.
    ///
    /// A hash the backend cannot match against a transfer to the treasury
    /// address yields [`GatewayError::Verification`]; the balance is left
    /// unchanged in that case.
    pub async fn verify_payment(
        &self,
        address: &WalletAddress,
        tx_hash: &str,
    ) -> Result<PaymentConfirmation, GatewayError> {
        debug!(%address, tx_hash, "verifying top-up payment");
        let context = "POST /billing/verify";
        let body = VerifyPaymentRequest {
            user_address: address.clone(),
            tx_hash: tx_hash.to_string(),
        };

        let response = self
            .http
            .post(self.url("/billing/verify"))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::from_transport(e, context))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::from_verify_status(status, body, context));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("{context} invalid JSON: {e}")))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn expect_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<T, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::from_transport(e, context))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::from_status(status, body, context));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("{context} invalid JSON: {e}")))
    }
}
