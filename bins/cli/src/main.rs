//! FX Desk operator command line.
//!
//! `quote` and `rates` work offline; every other command talks to the accounting engine
//! configured under `[engine]`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxdesk_core::conversion::{QuoteRequest, QuoteSummary};
use fxdesk_engine::{Desk, HttpEngine, State};
use fxdesk_shared::AppConfig;
use fxdesk_shared::config::DeskConfig;
use fxdesk_shared::types::{Money, OfficeCurrencies, TransactionCode, UserId, WalletId, format_amount};

/// FX Desk back-office tools.
#[derive(Debug, Parser)]
#[command(name = "fxdesk", version, about, long_about = None)]
struct Cli {
    /// Operator recorded in notes (random when omitted).
    #[arg(long, global = true)]
    operator: Option<UserId>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a quote request stored as JSON.
    Quote {
        /// Path to the request file.
        file: PathBuf,
    },
    /// Show the office currency table and the daily rate quotes start from.
    Rates,
    /// Commit pending trades of a wallet in one batch.
    Commit {
        /// Wallet to commit.
        wallet: String,
        /// Trade codes; the oldest pending trades that fit are used when empty.
        codes: Vec<String>,
    },
    /// Turn on partner balance tracking for a wallet.
    Track {
        /// Wallet to track.
        wallet: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fxdesk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;

    match cli.command {
        Command::Quote { file } => {
            let summary = evaluate(&file)?;
            print!("{}", render(&summary, config.desk.display_decimals));
        }
        Command::Rates => print!("{}", rates(&config.desk)),
        Command::Commit { wallet, codes } => {
            let desk = connect(&config, cli.operator)?;
            let selection = (!codes.is_empty())
                .then(|| codes.iter().map(|code| TransactionCode::from(code.as_str())).collect());
            let outcome = desk
                .grouped_commit(&WalletId::from(wallet.as_str()), selection)
                .await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            exit_on_failure(&outcome.state);
        }
        Command::Track { wallet } => {
            let desk = connect(&config, cli.operator)?;
            let state = desk
                .enable_partner_balance_tracking(&WalletId::from(wallet.as_str()))
                .await;
            println!("{}", serde_json::to_string_pretty(&state)?);
            exit_on_failure(&state);
        }
    }

    Ok(())
}

fn connect(config: &AppConfig, operator: Option<UserId>) -> anyhow::Result<Desk<HttpEngine>> {
    let engine = HttpEngine::new(&config.engine).context("failed to build engine client")?;
    info!(base_url = %config.engine.base_url, "Engine client ready");
    Ok(Desk::new(Arc::new(engine), operator.unwrap_or_default()))
}

fn evaluate(file: &Path) -> anyhow::Result<QuoteSummary> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    let request: QuoteRequest = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a quote request", file.display()))?;
    let summary = request.evaluate()?;
    info!(fields = summary.fields.len(), "Quote evaluated");
    Ok(summary)
}

fn render(summary: &QuoteSummary, decimal_places: u32) -> String {
    summary
        .rounded(decimal_places)
        .fields
        .iter()
        .map(|(name, value)| format!("{name:<24}{}\n", format_amount(*value, decimal_places)))
        .collect()
}

fn rates(desk: &DeskConfig) -> String {
    let mut out = String::new();
    for entry in desk.currencies.iter().flat_map(OfficeCurrencies::entries) {
        let role = match (entry.main, entry.base) {
            (true, true) => "main, base",
            (true, false) => "main",
            (false, true) => "base",
            (false, false) => "",
        };
        out.push_str(&format!("{:<6}{:<12}{role}\n", entry.name.to_string(), entry.default_rate.to_string()));
    }
    match (&desk.currencies, desk.daily_rate()) {
        (Some(table), Some(rate)) => out.push_str(&format!(
            "1 {} = {}\n",
            table.main().name,
            Money::new(rate, table.base().name).display(4)
        )),
        (None, Some(rate)) => out.push_str(&format!("daily rate {rate}\n")),
        (_, None) => out.push_str("no daily rate configured\n"),
    }
    out
}

fn exit_on_failure(state: &State) {
    if !state.is_success() {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_commit_with_codes() {
        let cli = Cli::try_parse_from(["fxdesk", "commit", "W1", "T1", "T3"]).unwrap();
        match cli.command {
            Command::Commit { wallet, codes } => {
                assert_eq!(wallet, "W1");
                assert_eq!(codes, vec!["T1", "T3"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_operator() {
        assert!(Cli::try_parse_from(["fxdesk", "--operator", "bob", "track", "W1"]).is_err());
    }

    #[test]
    fn test_render_formats_amounts() {
        let summary = QuoteSummary {
            fields: vec![("rate", dec!(3.6712)), ("amount", dec!(12500))],
        };
        assert_eq!(
            render(&summary, 2),
            format!("{:<24}3.67\n{:<24}12,500.00\n", "rate", "amount")
        );
    }

    #[test]
    fn test_rates_without_table_uses_fallback() {
        let desk = DeskConfig {
            default_daily_rate: Some(dec!(3.6)),
            ..DeskConfig::default()
        };
        assert_eq!(rates(&desk), "daily rate 3.6\n");
    }

    #[test]
    fn test_rates_quote_main_in_base() {
        let desk: DeskConfig = serde_json::from_str(
            r#"{"currencies": [
                {"name": "USD", "defaultRate": "3.67", "main": true},
                {"name": "AED", "defaultRate": "1", "base": true}
            ]}"#,
        )
        .unwrap();
        assert!(rates(&desk).ends_with("1 USD = AED 3.6700\n"));
    }
}
