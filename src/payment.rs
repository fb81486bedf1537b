// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Chainfeed

//! # Top-Up Payment Flow
//!
//! Caller-side state machine for crediting an account via an on-chain
//! transfer. The wallet signs and broadcasts the transfer out-of-band; this
//! flow tracks the phases and drives the single gateway-visible step, the
//! verification call.
//!
//! ```text
//! Idle -> AwaitingSignature -> AwaitingConfirmation -> Confirmed
//!      -> Verifying -> Verified | Failed
//! ```
//!
//! `Verified` and `Failed` are terminal. A transport or server failure during
//! verification restores `Confirmed` so the caller can retry; a
//! [`GatewayError::Verification`] outcome is final.

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::models::{PaymentConfirmation, WalletAddress};

/// Phase of a top-up payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentPhase {
    /// No payment in progress.
    Idle,
    /// Waiting for the wallet to sign the transfer.
    AwaitingSignature,
    /// Transfer broadcast; waiting for on-chain confirmation.
    AwaitingConfirmation,
    /// Confirmed on-chain; ready to submit for verification.
    Confirmed,
    /// Verification request in flight.
    Verifying,
    /// Backend matched the transfer and credited the account.
    Verified,
    /// Backend could not match the transfer; no credits were granted.
    Failed,
}

impl PaymentPhase {
    /// True for phases no transition leaves.
    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentPhase::Verified | PaymentPhase::Failed)
    }
}

impl std::fmt::Display for PaymentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaymentPhase::Idle => "idle",
            PaymentPhase::AwaitingSignature => "awaiting-signature",
            PaymentPhase::AwaitingConfirmation => "awaiting-confirmation",
            PaymentPhase::Confirmed => "confirmed",
            PaymentPhase::Verifying => "verifying",
            PaymentPhase::Verified => "verified",
            PaymentPhase::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

/// Errors from driving the payment flow.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("cannot {event} while {from}")]
    InvalidTransition {
        from: PaymentPhase,
        event: &'static str,
    },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Tracks one top-up payment from signature request to verification.
#[derive(Debug)]
pub struct PaymentFlow {
    phase: PaymentPhase,
    tx_hash: Option<String>,
    failure: Option<String>,
    confirmation: Option<PaymentConfirmation>,
}

impl PaymentFlow {
    pub fn new() -> Self {
        Self {
            phase: PaymentPhase::Idle,
            tx_hash: None,
            failure: None,
            confirmation: None,
        }
    }

    /// Start a flow for a transfer that is already confirmed on-chain, e.g.
    /// when the user pastes a transaction hash instead of paying in-app.
    pub fn for_confirmed_tx(tx_hash: impl Into<String>) -> Self {
        Self {
            phase: PaymentPhase::Confirmed,
            tx_hash: Some(tx_hash.into()),
            failure: None,
            confirmation: None,
        }
    }

    pub fn phase(&self) -> PaymentPhase {
        self.phase
    }

    /// The transfer hash, once known.
    pub fn tx_hash(&self) -> Option<&str> {
        self.tx_hash.as_deref()
    }

    /// Why verification failed, in the `Failed` phase.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// The backend confirmation, in the `Verified` phase.
    pub fn confirmation(&self) -> Option<&PaymentConfirmation> {
        self.confirmation.as_ref()
    }

    /// The wallet prompt went up: `Idle -> AwaitingSignature`.
    pub fn begin(&mut self) -> Result<(), FlowError> {
        self.transition(PaymentPhase::Idle, PaymentPhase::AwaitingSignature, "begin")
    }

    /// The wallet signed and broadcast the transfer:
    /// `AwaitingSignature -> AwaitingConfirmation`.
    pub fn signed(&mut self, tx_hash: impl Into<String>) -> Result<(), FlowError> {
        self.transition(
            PaymentPhase::AwaitingSignature,
            PaymentPhase::AwaitingConfirmation,
            "record signature",
        )?;
        self.tx_hash = Some(tx_hash.into());
        Ok(())
    }

    /// The transfer landed in a block: `AwaitingConfirmation -> Confirmed`.
    pub fn chain_confirmed(&mut self) -> Result<(), FlowError> {
        self.transition(
            PaymentPhase::AwaitingConfirmation,
            PaymentPhase::Confirmed,
            "record confirmation",
        )
    }

    /// Submit the confirmed transfer to the backend for crediting:
    /// `Confirmed -> Verifying -> Verified | Failed`.
    ///
    /// A [`GatewayError::Verification`] outcome is terminal and recorded in
    /// [`failure_reason`](Self::failure_reason); any other gateway error
    /// restores `Confirmed` so the call can be retried.
    pub async fn verify(
        &mut self,
        client: &GatewayClient,
        address: &WalletAddress,
    ) -> Result<&PaymentConfirmation, FlowError> {
        if self.phase != PaymentPhase::Confirmed {
            return Err(FlowError::InvalidTransition {
                from: self.phase,
                event: "verify",
            });
        }
        let tx_hash = self.tx_hash.clone().ok_or(FlowError::InvalidTransition {
            from: self.phase,
            event: "verify without a transaction hash",
        })?;

        self.phase = PaymentPhase::Verifying;
        match client.verify_payment(address, &tx_hash).await {
            Ok(confirmation) => {
                self.phase = PaymentPhase::Verified;
                Ok(&*self.confirmation.insert(confirmation))
            }
            Err(GatewayError::Verification(reason)) => {
                self.phase = PaymentPhase::Failed;
                self.failure = Some(reason.clone());
                Err(FlowError::Gateway(GatewayError::Verification(reason)))
            }
            Err(other) => {
                self.phase = PaymentPhase::Confirmed;
                Err(FlowError::Gateway(other))
            }
        }
    }

    fn transition(
        &mut self,
        from: PaymentPhase,
        to: PaymentPhase,
        event: &'static str,
    ) -> Result<(), FlowError> {
        if self.phase != from {
            return Err(FlowError::InvalidTransition {
                from: self.phase,
                event,
            });
        }
        self.phase = to;
        Ok(())
    }
}

impl Default for PaymentFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use serde_json::json;

    const ADDRESS: &str = "0x742d35cc6634c0532925a3b844bc9e7595f4ab12";

    fn client_for(server: &mockito::Server) -> GatewayClient {
        GatewayClient::new(GatewayConfig::new(server.url())).unwrap()
    }

    #[test]
    fn phases_walk_in_order() {
        let mut flow = PaymentFlow::new();
        assert_eq!(flow.phase(), PaymentPhase::Idle);

        flow.begin().unwrap();
        assert_eq!(flow.phase(), PaymentPhase::AwaitingSignature);

        flow.signed("0xfeed").unwrap();
        assert_eq!(flow.phase(), PaymentPhase::AwaitingConfirmation);
        assert_eq!(flow.tx_hash(), Some("0xfeed"));

        flow.chain_confirmed().unwrap();
        assert_eq!(flow.phase(), PaymentPhase::Confirmed);
        assert!(!flow.phase().is_terminal());
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut flow = PaymentFlow::new();
        assert!(matches!(
            flow.signed("0xfeed"),
            Err(FlowError::InvalidTransition { .. })
        ));
        assert!(matches!(
            flow.chain_confirmed(),
            Err(FlowError::InvalidTransition { .. })
        ));

        flow.begin().unwrap();
        assert!(matches!(
            flow.begin(),
            Err(FlowError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn verify_before_confirmation_is_rejected() {
        let mut flow = PaymentFlow::new();
        let client = GatewayClient::new(GatewayConfig::default()).unwrap();
        let err = flow.verify(&client, &ADDRESS.into()).await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidTransition { .. }));
        assert_eq!(flow.phase(), PaymentPhase::Idle);
    }

    #[tokio::test]
    async fn verified_payment_reaches_terminal_phase() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/billing/verify")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "tx_hash": "0xfeed", "credits": 500 }).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let mut flow = PaymentFlow::for_confirmed_tx("0xfeed");
        let confirmation = flow.verify(&client, &ADDRESS.into()).await.unwrap().clone();

        assert_eq!(flow.phase(), PaymentPhase::Verified);
        assert!(flow.phase().is_terminal());
        assert_eq!(confirmation.credits, 500);
        assert_eq!(flow.confirmation(), Some(&confirmation));
    }

    #[tokio::test]
    async fn unmatched_transfer_fails_terminally() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/billing/verify")
            .with_status(400)
            .with_body("no matching transfer to treasury")
            .create_async()
            .await;

        let client = client_for(&server);
        let mut flow = PaymentFlow::for_confirmed_tx("0xdead");
        let err = flow.verify(&client, &ADDRESS.into()).await.unwrap_err();

        assert!(matches!(
            err,
            FlowError::Gateway(GatewayError::Verification(_))
        ));
        assert_eq!(flow.phase(), PaymentPhase::Failed);
        assert_eq!(
            flow.failure_reason(),
            Some("no matching transfer to treasury")
        );
    }

    #[tokio::test]
    async fn transport_failure_leaves_flow_retryable() {
        // Nothing listens on port 9.
        let client = GatewayClient::new(GatewayConfig::new("http://127.0.0.1:9")).unwrap();
        let mut flow = PaymentFlow::for_confirmed_tx("0xfeed");
        let err = flow.verify(&client, &ADDRESS.into()).await.unwrap_err();

        assert!(matches!(
            err,
            FlowError::Gateway(GatewayError::Transport(_))
        ));
        assert_eq!(flow.phase(), PaymentPhase::Confirmed);
        assert!(flow.failure_reason().is_none());
    }

    #[test]
    fn phase_labels_match_dashboard_wording() {
        assert_eq!(PaymentPhase::AwaitingSignature.to_string(), "awaiting-signature");
        assert_eq!(PaymentPhase::Verified.to_string(), "verified");
    }
}
