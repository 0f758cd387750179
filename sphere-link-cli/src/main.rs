//! Sphere Link
//!
//! Decodes a Sphere payment link and continues it on the chosen platform.

mod config;
mod navigator;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{ConfigLoader, Overrides};
use sphere_link_core::resolver::Resolver;
use sphere_link_core::session::{Session, UiState};
use sphere_link_sdk::client::ProjectClient;
use sphere_link_sdk::link::DATA_PARAM;
use sphere_link_sdk::{
    Amount, Intent, LinkKind, LinkPayload, Platform, decode_page_url, encode_param,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Sphere Link - choose where to continue a payment link
#[derive(Parser, Debug)]
#[command(name = "sphere-link")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./sphere-link.toml")]
    config: PathBuf,

    /// Project API key (overrides config and environment)
    #[arg(long)]
    api_key: Option<String>,

    /// Override the backend base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long, default_value = "false")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a link page and optionally continue on a platform
    Open {
        /// Full page URL carrying the `data` parameter
        page_url: String,

        /// Platform to continue on (telegram, web, mobile)
        #[arg(short, long)]
        platform: Option<Platform>,
    },
    /// Decode a link page without contacting the backend
    Decode {
        /// Full page URL carrying the `data` parameter
        page_url: String,
    },
    /// Mint a `data` parameter
    Encode {
        /// request_link or send_link
        #[arg(long)]
        kind: LinkKind,
        /// request or send
        #[arg(long)]
        intent: Intent,
        #[arg(long)]
        id: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        chain: Option<String>,
        #[arg(long)]
        token: Option<String>,
        /// Page URL to attach the parameter to
        #[arg(long)]
        base: Option<Url>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.log_json);

    match args.command {
        Command::Open { page_url, platform } => {
            let loader = ConfigLoader::new(
                &args.config,
                Overrides {
                    api_key: args.api_key,
                    base_url: args.base_url,
                },
            );
            open(&loader, &page_url, platform).await
        }
        Command::Decode { page_url } => {
            let link = decode_page_url(&page_url).map_err(|e| {
                tracing::error!("Failed to decode link: {}", e);
                e
            })?;
            let out = serde_json::json!({
                "kind": link.kind,
                "payload": link.payload,
                "raw_param": link.raw_param,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Command::Encode {
            kind,
            intent,
            id,
            username,
            amount,
            chain,
            token,
            base,
        } => {
            let payload = LinkPayload {
                intent,
                id,
                amount: amount.as_deref().map(Amount::parse_lenient),
                username,
                chain,
                token,
            };
            let param = encode_param(kind, &payload)?;
            match base {
                Some(mut page) => {
                    page.query_pairs_mut().append_pair(DATA_PARAM, &param);
                    println!("{page}");
                }
                None => println!("{param}"),
            }
            Ok(())
        }
    }
}

async fn open(
    loader: &ConfigLoader,
    page_url: &str,
    platform: Option<Platform>,
) -> anyhow::Result<()> {
    tracing::info!("Starting sphere-link v{}", env!("CARGO_PKG_VERSION"));

    let settings = loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let client = ProjectClient::new(settings.base_url.clone(), settings.api_key.clone())
        .with_timeout(settings.timeout);

    let session = Session::new();
    let ready = match session.initialize(page_url, &client).await? {
        UiState::Ready(ready) => ready,
        UiState::Failed(failure) => {
            print!("{}", render::render_failure(&failure));
            anyhow::bail!("{}", failure.detail);
        }
        UiState::Loading => anyhow::bail!("session did not settle"),
    };
    print!("{}", render::render_ready(&ready));

    let Some(platform) = platform else {
        return Ok(());
    };

    let navigator = navigator::from_launcher(settings.launcher.as_deref());
    let resolver = Resolver::from_ready(&ready, navigator)
        .context("no link to forward")?
        .with_fallback_delay(settings.mobile_fallback_delay);

    let outcome = resolver.select(platform).await.map_err(|e| {
        tracing::error!("{}: {}", e.user_message(), e);
        e
    })?;
    tracing::info!(?outcome, "navigation finished");
    Ok(())
}

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "info,reqwest=warn,hyper=warn";

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr so rendered output and printed targets stay on stdout.
fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_parses() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing_subscriber::filter::LevelFilter::INFO)
        );
    }
}
