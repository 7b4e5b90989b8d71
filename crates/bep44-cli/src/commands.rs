use anyhow::{bail, Context};
use bep44_crypto::{sign, verify, Signature, SigningKey};
use bep44_store::{Item, MemoryStore, Wrapper, WrapperConfig};
use bep44_types::{Target, Value, PUBLIC_KEY_LEN};
use colored::Colorize;
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Keygen(args) => cmd_keygen(args, &format),
        Command::Target(args) => cmd_target(args, &format),
        Command::Sign(args) => cmd_sign(args, &format),
        Command::Verify(args) => cmd_verify(args, &format),
        Command::Demo(args) => cmd_demo(args, &format),
    }
}

fn parse_value(args: &ValueArgs) -> anyhow::Result<Value> {
    if args.bencoded {
        Value::decode(args.value.as_bytes()).context("--value is not valid bencode")
    } else {
        Ok(Value::from(args.value.as_str()))
    }
}

fn parse_public_key(s: &str) -> anyhow::Result<[u8; PUBLIC_KEY_LEN]> {
    let bytes = hex::decode(s).context("public key is not hex")?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("public key must be {PUBLIC_KEY_LEN} bytes, got {len}"))
}

fn show_value(value: &Value) -> String {
    String::from_utf8_lossy(&value.encode()).into_owned()
}

fn cmd_keygen(args: KeygenArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let key = match args.secret {
        Some(secret) => SigningKey::from_hex(&secret).context("invalid secret")?,
        None => SigningKey::generate(),
    };
    let secret = hex::encode(key.as_bytes());
    let public = hex::encode(key.verifying_key().as_bytes());
    match format {
        OutputFormat::Json => println!("{}", json!({ "secret": secret, "public": public })),
        OutputFormat::Text => {
            println!("{} {}", "secret:".dimmed(), secret.red());
            println!("{} {}", "public:".dimmed(), public.green());
        }
    }
    Ok(())
}

fn cmd_target(args: TargetArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let (kind, target) = match (&args.key, &args.value) {
        (Some(key), _) => {
            let salt = args.salt.unwrap_or_default();
            ("mutable", Target::mutable(&parse_public_key(key)?, salt.as_bytes()))
        }
        (None, Some(value)) => {
            let value = parse_value(&ValueArgs {
                value: value.clone(),
                bencoded: args.bencoded,
            })?;
            ("immutable", Target::immutable(&value))
        }
        (None, None) => bail!("either --value or --key is required"),
    };
    match format {
        OutputFormat::Json => println!("{}", json!({ "kind": kind, "target": target.to_hex() })),
        OutputFormat::Text => println!("{} ({kind})", target.to_hex().yellow()),
    }
    Ok(())
}

fn cmd_sign(args: SignArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let key = SigningKey::from_hex(&args.secret).context("invalid secret")?;
    let value = parse_value(&args.value)?;
    let encoded = value.encode();
    let sig = sign(&key, args.salt.as_bytes(), args.seq, &encoded);
    let target = key.verifying_key().target(args.salt.as_bytes());
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "public": hex::encode(key.verifying_key().as_bytes()),
                "target": target.to_hex(),
                "seq": args.seq,
                "sig": sig.to_hex(),
            })
        ),
        OutputFormat::Text => {
            println!("{} {}", "target:".dimmed(), target.to_hex().yellow());
            println!("{} {}", "seq:".dimmed(), args.seq);
            println!("{} {}", "sig:".dimmed(), sig.to_hex());
        }
    }
    Ok(())
}

fn cmd_verify(args: VerifyArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let key = parse_public_key(&args.key)?;
    let sig = Signature::from_hex(&args.sig).context("invalid signature hex")?;
    let value = parse_value(&args.value)?;
    let valid = verify(&key, args.salt.as_bytes(), args.seq, &value.encode(), &sig);
    match format {
        OutputFormat::Json => println!("{}", json!({ "valid": valid })),
        OutputFormat::Text if valid => println!("{} signature valid", "✓".green().bold()),
        OutputFormat::Text => println!("{} signature invalid", "✗".red().bold()),
    }
    if !valid {
        bail!("signature does not verify");
    }
    Ok(())
}

fn cmd_demo(args: DemoArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => WrapperConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => WrapperConfig::default(),
    };
    let wrapper = Wrapper::from_config(MemoryStore::new(), &config)?;
    let key = SigningKey::generate();

    let steps = [
        ("immutable \"hello\"", Item::immutable("hello")),
        ("mutable seq=1 \"a\"", Item::new_mutable("a", b"".to_vec(), 1, 0, &key)),
        ("mutable seq=1 \"b\"", Item::new_mutable("b", b"".to_vec(), 1, 0, &key)),
        ("mutable seq=2 \"b\"", Item::new_mutable("b", b"".to_vec(), 2, 0, &key)),
    ];

    let mut report = Vec::new();
    for (label, item) in steps {
        let target = item.target();
        let outcome = wrapper.put(item);
        let current = wrapper.get(&target).ok();
        match format {
            OutputFormat::Json => report.push(json!({
                "put": label,
                "target": target.to_hex(),
                "accepted": outcome.is_ok(),
                "error": outcome.as_ref().err().map(|e| e.to_string()),
                "code": outcome.as_ref().err().and_then(|e| e.wire_code()),
                "stored": current.as_ref().map(|i| show_value(i.value())),
            })),
            OutputFormat::Text => {
                match &outcome {
                    Ok(()) => println!("{} put {label}", "✓".green().bold()),
                    Err(e) => println!(
                        "{} put {label}: {e} ({})",
                        "✗".red().bold(),
                        e.wire_code().map_or("-".into(), |c| c.to_string())
                    ),
                }
                if let Some(item) = current {
                    println!(
                        "  {} {} seq={} v={}",
                        "get".dimmed(),
                        target.short_hex().yellow(),
                        item.seq(),
                        show_value(item.value())
                    );
                }
            }
        }
    }
    if let OutputFormat::Json = format {
        println!("{}", serde_json::Value::Array(report));
    }
    Ok(())
}
