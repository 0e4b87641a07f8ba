//! Interactive shell for payment orders.
//!
//! ```text
//! » order create 0xf39f... 10 EUR MYST
//! » order get 0xf39f... 42
//! » order get-all 0xf39f...
//! ```

use clap::Parser;
use payment_order_gateway::{
    cli::{order::usage, ConsoleOutput, OrderCommands, OutputSink},
    config::Config,
    services::{signer::Keystore, upstream::PilvytisClient},
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "order_shell", about = "Create and inspect payment orders")]
struct Args {
    /// Upstream payment service URL (overrides PILVYTIS_URL)
    #[arg(long, env = "PILVYTIS_URL")]
    upstream_url: Option<String>,

    /// Run a single shell line (e.g. "order get-all 0x...") and exit
    #[arg(short, long)]
    command: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(url) = args.upstream_url {
        config.pilvytis_url = url;
    }

    let keystore = Keystore::from_private_keys(&config.identity_keys)?;
    let client = PilvytisClient::new(
        &config.pilvytis_url,
        config.upstream_timeout,
        Arc::new(keystore),
    )?;

    let out: Arc<dyn OutputSink> = Arc::new(ConsoleOutput);
    let orders = OrderCommands::new(Arc::new(client), out.clone());

    if let Some(line) = args.command {
        dispatch(&orders, out.as_ref(), &line).await;
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all("» ".as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if !dispatch(&orders, out.as_ref(), &line).await {
            break;
        }
    }
    Ok(())
}

/// Runs one shell line. Returns false when the shell should exit.
async fn dispatch(orders: &OrderCommands, out: &dyn OutputSink, line: &str) -> bool {
    let line = line.trim();
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match command {
        "" => {}
        "order" => orders.run(rest).await,
        "help" => out.info(&usage()),
        "exit" | "quit" => return false,
        other => out.warn(&format!("Unknown command '{}', try 'help'", other)),
    }
    true
}
