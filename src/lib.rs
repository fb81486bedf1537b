// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Chainfeed

//! Chainfeed Gateway - On-Chain News Platform Client
//!
//! This crate provides a typed async client for the Chainfeed backend: the
//! news feed, API key lifecycle, billing reads, and on-chain top-up payment
//! verification.
//!
//! ## Modules
//!
//! - `client` - The gateway client (reqwest)
//! - `config` - Environment-driven configuration
//! - `error` - Failure taxonomy
//! - `identity` - Pluggable wallet-ownership proofs
//! - `models` - Wire types
//! - `payment` - Caller-side top-up flow state machine

pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod payment;

pub use client::GatewayClient;
pub use config::GatewayConfig;
pub use error::GatewayError;
