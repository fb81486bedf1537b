// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Chainfeed

//! Operator console for the Chainfeed backend.
//!
//! Command-line counterpart of the dashboard pages: news feed, login,
//! API key lifecycle, billing reads, and top-up verification.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chainfeed_gateway::{
    client::GatewayClient,
    identity::{IdentityVerifier, LocalKeyVerifier, PlaceholderVerifier},
    models::{NewsQuery, WalletAddress},
    payment::PaymentFlow,
};

#[derive(Parser)]
#[command(name = "chainfeed", version, about = "Chainfeed backend operator console")]
struct Cli {
    /// Wallet address used as the account identity.
    #[arg(long, env = "WALLET_ADDRESS", global = true)]
    address: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check backend liveness.
    Health,
    /// Show news items, optionally filtered by token.
    News {
        /// Token identifier to filter by (e.g. "bitcoin").
        #[arg(long)]
        token: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Log in, registering the address on first use.
    Login {
        /// Hex-encoded private key to sign the login challenge.
        /// Falls back to the placeholder proof if omitted.
        #[arg(long, env = "WALLET_PRIVATE_KEY", hide_env_values = true)]
        private_key: Option<String>,
    },
    /// Manage API keys.
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
    /// Show the credit balance.
    Balance,
    /// Show total requests and plan tier.
    Usage,
    /// Submit a confirmed top-up transaction hash for verification.
    Verify {
        /// Hash of the on-chain transfer to the treasury address.
        tx_hash: String,
    },
}

#[derive(Subcommand)]
enum KeysAction {
    /// List key metadata (never includes secrets).
    List,
    /// Create a key; the secret is printed exactly once.
    Create { name: String },
    /// Revoke a key by id.
    Revoke { id: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = GatewayClient::from_env()?;

    match cli.command {
        Command::Health => {
            println!("{}", client.health().await?);
        }

        Command::News {
            token,
            limit,
            offset,
        } => {
            let query = NewsQuery {
                token_id: token,
                limit: Some(limit),
                offset: Some(offset),
            };
            let items = client.list_news(&query).await?;
            if items.is_empty() {
                println!("no news items");
            }
            for item in items {
                println!("[{}] {} ({})", item.timestamp, item.title, item.token_id);
                for source in &item.sources {
                    println!("    source: {source}");
                }
            }
        }

        Command::Login { private_key } => {
            let address = require_address(cli.address)?;
            let verifier: Box<dyn IdentityVerifier> = match private_key {
                Some(key) => Box::new(LocalKeyVerifier::from_hex(&key)?),
                None => Box::new(PlaceholderVerifier),
            };
            let session = client.ensure_identity(&address, verifier.as_ref()).await?;
            if session.registered {
                println!("registered {}", session.address);
            } else {
                println!("logged in as {}", session.address);
            }
        }

        Command::Keys { action } => {
            let address = require_address(cli.address)?;
            match action {
                KeysAction::List => {
                    let keys = client.list_api_keys(&address).await?;
                    if keys.is_empty() {
                        println!("no API keys");
                    }
                    for key in keys {
                        println!("{}  {}  created {}", key.id, key.name, key.created_at);
                    }
                }
                KeysAction::Create { name } => {
                    let created = client.create_api_key(&address, &name).await?;
                    println!("created key {} ({})", created.id, created.name);
                    println!("secret (shown once, store it now): {}", created.key);
                }
                KeysAction::Revoke { id } => {
                    client.revoke_api_key(&address, &id).await?;
                    println!("revoked key {id}");
                }
            }
        }

        Command::Balance => {
            let address = require_address(cli.address)?;
            let balance = client.get_balance(&address).await?;
            println!("{} credits", balance.credits);
        }

        Command::Usage => {
            let address = require_address(cli.address)?;
            let usage = client.get_usage(&address).await?;
            println!("{} requests on the {} plan", usage.total_requests, usage.plan);
        }

        Command::Verify { tx_hash } => {
            let address = require_address(cli.address)?;
            let mut flow = PaymentFlow::for_confirmed_tx(tx_hash);
            match flow.verify(&client, &address).await {
                Ok(confirmation) => {
                    println!(
                        "verified {}; balance is now {} credits",
                        confirmation.tx_hash, confirmation.credits
                    );
                }
                Err(e) => {
                    if let Some(reason) = flow.failure_reason() {
                        eprintln!("payment rejected: {reason}");
                    }
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}

fn require_address(address: Option<String>) -> Result<WalletAddress, Box<dyn std::error::Error>> {
    match address {
        Some(a) if !a.trim().is_empty() => Ok(WalletAddress(a.trim().to_string())),
        _ => Err("wallet address required: pass --address or set WALLET_ADDRESS".into()),
    }
}
