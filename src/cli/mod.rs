//! CLI module for ShelfScan
//!
//! Subcommands:
//! - `serve`: run the recognition HTTP server
//! - `encrypt-credential`: encrypt a provider API key for storage

pub mod serve;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::crypto::CredentialCodec;

/// ShelfScan - image-based product recognition with provider fallback
#[derive(Parser)]
#[command(name = "shelfscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the recognition API server
    Serve,

    /// Encrypt a provider API key with the configured encryption key
    EncryptCredential(EncryptArgs),
}

#[derive(Args)]
pub struct EncryptArgs {
    /// Plaintext API key to encrypt
    pub plaintext: String,
}

/// Encrypt a credential and print the storable token.
pub fn encrypt_credential(args: &EncryptArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    let codec = CredentialCodec::new(&config.recognition.encryption_key)?;

    println!("{}", codec.encrypt(&args.plaintext));
    Ok(())
}
