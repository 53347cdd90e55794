use std::io;

use solsms::{Provider, SolSms};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = std::env::var("SOLSMS_CONFIG").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SOLSMS_CONFIG environment variable is required (JSON with APIKey, SID, Sender)",
        )
    })?;
    let to = std::env::var("SOLSMS_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SOLSMS_TO environment variable is required",
        )
    })?;
    let body = std::env::var("SOLSMS_BODY")
        .unwrap_or_else(|_| "Your verification code is 123456".to_owned());

    let channel = SolSms::new(config.as_bytes())?;
    channel.validate_address(&to)?;
    if body.len() > channel.max_body_len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("body exceeds {} bytes", channel.max_body_len()),
        )
        .into());
    }

    match channel.push(&to, body.as_bytes()).await {
        Ok(()) => println!("{} sent via {}", channel.channel_name(), channel.id()),
        Err(err) => {
            eprintln!(
                "push failed ({:?}, retryable: {}): {err}",
                err.kind(),
                err.is_retryable()
            );
            return Err(err.into());
        }
    }

    Ok(())
}
