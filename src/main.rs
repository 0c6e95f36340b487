//! evm-kms-signer
//!
//! Command line front end for signing EVM payloads with a secp256k1 key held
//! in AWS KMS, and for checking who signed a message or transaction.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{dyn_abi::TypedData, primitives::B256};
use clap::{Args, Parser, Subcommand};
use eyre::{Result, WrapErr};
use serde_json::json;

use evm_kms_signer::{
    config::{load_config, AppConfig},
    logging::setup_logging,
    models::{AwsKmsSignerConfig, EvmTransactionRequest},
    services::{
        recover_message_signer, recover_transaction_signer, AwsKmsService, AwsKmsSigner, Signer,
        SignerFactory,
    },
    utils::to_checksum_address,
};

#[derive(Parser, Debug)]
#[command(name = "evm-kms-signer")]
#[command(about = "Sign EVM messages, typed data and transactions with an AWS KMS key")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Which KMS key to use. A direct key id wins over the config file.
#[derive(Args, Debug)]
struct SignerArgs {
    /// KMS key id, ARN or alias
    #[arg(long, env = "AWS_KMS_KEY_ID")]
    key_id: Option<String>,

    /// AWS region of the key (defaults to the AWS provider chain)
    #[arg(long, env = "AWS_KMS_REGION")]
    region: Option<String>,

    /// Signer config file (defaults to CONFIG_FILE_PATH)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Signer id within the config file (defaults to SIGNER_ID)
    #[arg(long)]
    signer_id: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the checksummed address of the key
    Address(SignerArgs),
    /// Sign a 32-byte digest as is
    SignDigest {
        digest: B256,
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Sign an EIP-191 personal message
    SignMessage {
        message: String,
        /// Treat MESSAGE as 0x-prefixed hex bytes
        #[arg(long)]
        hex: bool,
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Sign EIP-712 typed data read from a JSON file
    SignTypedData {
        file: PathBuf,
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Sign a transaction request read from a JSON file
    SignTransaction {
        file: PathBuf,
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Recover the address that signed a personal message
    RecoverMessage {
        message: String,
        signature: String,
        /// Treat MESSAGE as 0x-prefixed hex bytes
        #[arg(long)]
        hex: bool,
    },
    /// Recover the address that signed a transaction
    RecoverTransaction {
        /// Transaction request JSON the signed transaction was built from
        file: PathBuf,
        signed_tx: String,
    },
}

async fn build_signer(args: SignerArgs) -> Result<AwsKmsSigner> {
    if let Some(key_id) = args.key_id {
        let service = AwsKmsService::new(AwsKmsSignerConfig {
            key_id,
            region: args.region,
        })
        .await?;
        return Ok(AwsKmsSigner::new(service));
    }

    let app_config = AppConfig::from_env();
    let path = args
        .config
        .unwrap_or_else(|| PathBuf::from(&app_config.config_file_path));
    let config = load_config(&path)
        .wrap_err_with(|| format!("Failed to load signer config {}", path.display()))?;

    let signer_id = args.signer_id.or(app_config.signer_id);
    let signer_config = config.select(signer_id.as_deref())?;

    Ok(SignerFactory::create_evm_signer(signer_config).await?)
}

fn message_bytes(message: &str, is_hex: bool) -> Result<Vec<u8>> {
    if is_hex {
        let hex_str = message.strip_prefix("0x").unwrap_or(message);
        return hex::decode(hex_str).wrap_err("Message is not valid hex");
    }
    Ok(message.as_bytes().to_vec())
}

fn read_json<T: serde::de::DeserializeOwned>(file: &Path) -> Result<T> {
    let content =
        fs::read_to_string(file).wrap_err_with(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&content).wrap_err_with(|| format!("Failed to parse {}", file.display()))
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Address(args) => {
            let signer = build_signer(args).await?;
            println!("{}", to_checksum_address(&signer.address().await?));
        }
        Command::SignDigest { digest, signer } => {
            let signer = build_signer(signer).await?;
            println!("{}", signer.sign_digest(digest).await?);
        }
        Command::SignMessage {
            message,
            hex,
            signer,
        } => {
            let message = message_bytes(&message, hex)?;
            let signer = build_signer(signer).await?;
            println!("{}", signer.sign_message(&message).await?);
        }
        Command::SignTypedData { file, signer } => {
            let typed_data: TypedData = read_json(&file)?;
            let signer = build_signer(signer).await?;
            println!("{}", signer.sign_typed_data(&typed_data).await?);
        }
        Command::SignTransaction { file, signer } => {
            let request: EvmTransactionRequest = read_json(&file)?;
            let signer = build_signer(signer).await?;
            let signed = signer.sign_transaction(&request).await?;
            let output = json!({
                "hash": signed.hash,
                "signature": {
                    "r": format!("0x{}", signed.signature.r_hex()),
                    "s": format!("0x{}", signed.signature.s_hex()),
                    "v": signed.signature.v,
                },
                "raw": signed.raw_hex(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::RecoverMessage {
            message,
            signature,
            hex,
        } => {
            let message = message_bytes(&message, hex)?;
            let address = recover_message_signer(&message, &signature)?;
            println!("{}", to_checksum_address(&address));
        }
        Command::RecoverTransaction { file, signed_tx } => {
            let request: EvmTransactionRequest = read_json(&file)?;
            let address = recover_transaction_signer(&request, &signed_tx)?;
            println!("{}", to_checksum_address(&address));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    setup_logging()?;

    let cli = Cli::parse();
    run(cli.command).await
}
