use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bep44",
    about = "BEP44 item tools: keys, targets, signatures, and a local store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate an Ed25519 key pair
    Keygen(KeygenArgs),
    /// Compute the target of an item
    Target(TargetArgs),
    /// Sign a mutable item
    Sign(SignArgs),
    /// Verify a mutable item's signature
    Verify(VerifyArgs),
    /// Run a put/get walkthrough against an in-memory store
    Demo(DemoArgs),
}

/// How the item value is given on the command line.
#[derive(Args, Clone, Debug)]
pub struct ValueArgs {
    /// The value, stored as a byte string
    #[arg(long)]
    pub value: String,
    /// Treat --value as already-bencoded text (e.g. "li1ei2ee")
    #[arg(long)]
    pub bencoded: bool,
}

#[derive(Args)]
pub struct KeygenArgs {
    /// Derive from this hex secret instead of generating one
    #[arg(long)]
    pub secret: Option<String>,
}

#[derive(Args)]
pub struct TargetArgs {
    /// Value of an immutable item
    #[arg(long, required_unless_present = "key")]
    pub value: Option<String>,
    /// Treat --value as already-bencoded text
    #[arg(long, requires = "value")]
    pub bencoded: bool,
    /// Hex public key; computes a mutable target
    #[arg(long, conflicts_with = "value")]
    pub key: Option<String>,
    #[arg(long, requires = "key")]
    pub salt: Option<String>,
}

#[derive(Args)]
pub struct SignArgs {
    /// Hex secret key
    #[arg(long)]
    pub secret: String,
    #[command(flatten)]
    pub value: ValueArgs,
    #[arg(long)]
    pub seq: i64,
    #[arg(long, default_value = "")]
    pub salt: String,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Hex public key
    #[arg(long)]
    pub key: String,
    #[command(flatten)]
    pub value: ValueArgs,
    #[arg(long)]
    pub seq: i64,
    #[arg(long, default_value = "")]
    pub salt: String,
    /// Hex signature
    #[arg(long)]
    pub sig: String,
}

#[derive(Args)]
pub struct DemoArgs {
    /// TOML file with wrapper settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}
