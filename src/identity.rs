// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Chainfeed

//! # Identity Proof
//!
//! The backend keys every account on a wallet address, and `POST /auth/login`
//! expects a proof that the caller controls that address: a challenge message
//! and a signature over it. How that proof is produced is a pluggable
//! strategy, not something the client hardcodes.
//!
//! ## Verifiers
//!
//! - [`PlaceholderVerifier`] reproduces the development-era auto-login the
//!   platform launched with (`"Auto-login"` / `"0x"`). The backend currently
//!   accepts it; a production deployment must not.
//! - [`LocalKeyVerifier`] signs the challenge with a local secp256k1 key,
//!   producing the standard 65-byte Ethereum personal-message signature.

use alloy::signers::{local::PrivateKeySigner, SignerSync};

use crate::models::WalletAddress;

/// Challenge message and signature submitted with a login request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginProof {
    /// The message that was signed.
    pub message: String,
    /// Hex-encoded signature over `message`, `0x`-prefixed.
    pub signature: String,
}

/// Errors producing a login proof.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("signer controls {actual}, not {requested}")]
    AddressMismatch {
        requested: WalletAddress,
        actual: WalletAddress,
    },
}

/// Strategy for proving control of a wallet address at login.
pub trait IdentityVerifier: Send + Sync {
    /// Produce a proof for `address`.
    fn prove(&self, address: &WalletAddress) -> Result<LoginProof, IdentityError>;
}

/// Auto-login stub: no signature at all.
///
/// Kept for parity with backends still running in open-registration mode.
/// Do not use against a backend that verifies proofs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderVerifier;

impl IdentityVerifier for PlaceholderVerifier {
    fn prove(&self, _address: &WalletAddress) -> Result<LoginProof, IdentityError> {
        Ok(LoginProof {
            message: "Auto-login".to_string(),
            signature: "0x".to_string(),
        })
    }
}

/// Signs the login challenge with a locally-held secp256k1 key.
pub struct LocalKeyVerifier {
    signer: PrivateKeySigner,
}

impl LocalKeyVerifier {
    /// Build a verifier from a hex-encoded private key (with or without the
    /// `0x` prefix).
    pub fn from_hex(private_key_hex: &str) -> Result<Self, IdentityError> {
        let trimmed = private_key_hex
            .trim()
            .trim_start_matches("0x")
            .trim_start_matches("0X");
        let key_bytes = alloy::hex::decode(trimmed)
            .map_err(|e| IdentityError::InvalidKey(e.to_string()))?;
        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| IdentityError::InvalidKey(e.to_string()))?;
        Ok(Self { signer })
    }

    /// The address this verifier can prove control of.
    pub fn address(&self) -> WalletAddress {
        WalletAddress(format!("{:#x}", self.signer.address()))
    }

    fn challenge(address: &WalletAddress) -> String {
        format!("Chainfeed login\naddress: {address}")
    }
}

impl IdentityVerifier for LocalKeyVerifier {
    fn prove(&self, address: &WalletAddress) -> Result<LoginProof, IdentityError> {
        let own = self.address();
        if !own.0.eq_ignore_ascii_case(&address.0) {
            return Err(IdentityError::AddressMismatch {
                requested: address.clone(),
                actual: own,
            });
        }

        let message = Self::challenge(address);
        let signature = self
            .signer
            .sign_message_sync(message.as_bytes())
            .map_err(|e| IdentityError::Signing(e.to_string()))?;

        Ok(LoginProof {
            message,
            signature: format!("0x{}", alloy::hex::encode(signature.as_bytes())),
        })
    }
}
