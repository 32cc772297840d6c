//! Paidplay - terminal front end
//!
//! Interactive play against the mock wallet, fee quotes, and headless
//! simulation.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use cli::{Cli, Command};
use paidplay::{
    AppConfig, CoinGeckoPriceFeed, ControllerPhase, DifficultyPolicy, EventReceiver,
    FixedPriceFeed, GameDriver, GameEvent, MockBehavior, MockPaymentProcessor, PriceFeed,
    RandomSource, RngSource, RoundOutcome, Session, event_channel,
    estimate_native_amount_for_fiat,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Account the mock wallet pays from.
const MOCK_PAYER: &str = "0x00000000000000000000000000000000000b0b00";

/// Simulated block confirmation time.
const MOCK_CONFIRMATION: Duration = Duration::from_millis(300);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)?.with_env_overrides();

    match cli.command {
        Command::Play {
            seed,
            reject_payment,
            offline_price,
        } => run_play(config, seed, reject_payment, offline_price).await,
        Command::Quote { usd, offline_price } => run_quote(config, usd, offline_price).await,
        Command::Simulate { rounds, seed } => run_simulate(config, rounds, seed),
    }
}

/// Logs go to stderr so they never interleave with the board on stdout.
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn price_feed(config: &AppConfig, offline: bool) -> Arc<dyn PriceFeed> {
    if offline {
        Arc::new(FixedPriceFeed::new(*config.fallback_native_usd_price()))
    } else {
        Arc::new(CoinGeckoPriceFeed::new(
            config.price_api_url(),
            config.price_coin_id(),
        ))
    }
}

/// Line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Start,
    Move(usize),
    Reset,
    ScoreReset,
    Board,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim().to_lowercase();
    if let Ok(index) = line.parse::<usize>() {
        return Input::Move(index);
    }
    match line.as_str() {
        "start" | "pay" => Input::Start,
        "reset" => Input::Reset,
        "scores" | "reset-scores" => Input::ScoreReset,
        "board" | "" => Input::Board,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => paidplay::Position::from_label_or_number(other)
            .map(|pos| Input::Move(pos.to_index()))
            .unwrap_or_else(|| Input::Unknown(other.to_string())),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  start           pay the entry fee and begin a round");
    println!("  0-8 | top-left  place X (labels: top-left ... bottom-right)");
    println!("  reset           clear the board after a round");
    println!("  reset-scores    zero the score");
    println!("  board           show the board");
    println!("  quit");
}

fn outcome_message(outcome: RoundOutcome) -> &'static str {
    match outcome.winner() {
        Some(player) if player.is_human() => "You win!",
        Some(_) => "Computer wins!",
        None => "It's a draw!",
    }
}

async fn print_events(mut rx: EventReceiver) {
    while let Some(event) = rx.recv().await {
        let kind: &'static str = (&event).into();
        debug!(kind, "Event received");
        match event {
            GameEvent::MoveApplied { position, player } => {
                println!("{} plays {}", player, position)
            }
            GameEvent::RoundFinished { outcome } => println!("{}", outcome_message(outcome)),
            GameEvent::SessionStateChanged { state } => println!("[{}]", state),
            GameEvent::ScoreChanged { tally } => println!("Score: {}", tally),
            GameEvent::PaymentRequested { request } => {
                println!("Paying ${:.2} entry fee...", request.usd_amount)
            }
            GameEvent::PaymentRejected { reason } => println!("Payment failed: {}", reason),
        }
    }
}

/// Interactive terminal game.
#[instrument(skip(config))]
async fn run_play(
    config: AppConfig,
    seed: Option<u64>,
    reject_payment: bool,
    offline_price: bool,
) -> Result<()> {
    info!(chain = %config.chain(), contract = %config.contract_address(), "Starting play");

    let (tx, rx) = event_channel();
    let rng: Box<dyn RandomSource + Send> = match seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::from_entropy()),
    };
    let session = Session::new(*config.entry_fee_usd(), DifficultyPolicy::new(), rng, tx);

    let mut processor = MockPaymentProcessor::new(MOCK_PAYER).with_latency(MOCK_CONFIRMATION);
    if reject_payment {
        processor =
            processor.with_behavior(MockBehavior::Reject("User rejected the request".to_string()));
    }
    let driver = GameDriver::from_config(
        &config,
        session,
        price_feed(&config, offline_price),
        Arc::new(processor),
    );
    let printer = tokio::spawn(print_events(rx));

    print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Start => {
                if !driver.start_session().await {
                    println!("No round started ({}).", driver.state().await);
                }
            }
            Input::Move(index) => {
                if driver.request_move(index).await.is_none() {
                    println!("Move not accepted.");
                    continue;
                }
                if driver.phase().await == ControllerPhase::ComputerThinking {
                    println!("Computer is thinking...");
                }
                driver.settle().await;
                println!("{}", driver.board_display().await);
            }
            Input::Reset => {
                if !driver.request_reset().await {
                    println!("Cannot reset right now.");
                }
            }
            Input::ScoreReset => driver.request_score_reset().await,
            Input::Board => println!("{}", driver.board_display().await),
            Input::Help => print_help(),
            Input::Quit => break,
            Input::Unknown(text) => {
                warn!(input = %text, "Unrecognized input");
                println!("Unknown command '{}'. Type 'help'.", text);
            }
        }
    }

    driver.settle().await;
    println!("Final score: {}", driver.tally().await);
    drop(driver);
    printer.await.context("Event printer task failed")?;
    info!("Play finished");
    Ok(())
}

/// Prints the native amount for a USD fee.
#[instrument(skip(config))]
async fn run_quote(config: AppConfig, usd: Option<f64>, offline_price: bool) -> Result<()> {
    let usd = usd.unwrap_or(*config.entry_fee_usd());
    ensure!(usd.is_finite() && usd > 0.0, "USD amount must be positive, got {}", usd);

    let feed = price_feed(&config, offline_price);
    let amount = estimate_native_amount_for_fiat(
        feed.as_ref(),
        usd,
        *config.fallback_native_usd_price(),
    )
    .await;
    println!("${:.2} = {} ({})", usd, amount, config.price_coin_id());
    Ok(())
}

/// Plays `rounds` confirmed rounds with a uniformly random human.
#[instrument(skip(config))]
fn run_simulate(config: AppConfig, rounds: u32, seed: Option<u64>) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    info!(seed, rounds, "Simulating rounds");

    let (tx, rx) = event_channel();
    drop(rx);
    let mut session = Session::new(
        *config.entry_fee_usd(),
        DifficultyPolicy::new(),
        Box::new(RngSource::seeded(seed)),
        tx,
    );
    let mut human = RngSource::seeded(seed.wrapping_add(1));

    for round in 0..rounds {
        session
            .request_start_session()
            .with_context(|| format!("Round {} could not be requested", round))?;
        ensure!(session.notify_payment_confirmed(), "Round {} did not activate", round);

        loop {
            match session.phase() {
                ControllerPhase::WaitingForHumanMove => {
                    let open = session.board().valid_moves();
                    let pick = open[human.next_index(open.len())];
                    session
                        .request_move(pick.to_index())
                        .with_context(|| format!("Human move {} refused", pick))?;
                }
                ControllerPhase::ComputerThinking => {
                    session
                        .play_computer_turn()
                        .context("Computer turn refused")?;
                }
                ControllerPhase::RoundFinished(outcome) => {
                    debug!(round, outcome = %outcome, "Round complete");
                    break;
                }
            }
        }
        ensure!(session.request_reset(), "Round {} could not be reset", round);
    }

    println!("Seed {}: {}", seed, session.tally());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input(" 4 "), Input::Move(4));
        assert_eq!(parse_input("9"), Input::Move(9));
        assert_eq!(parse_input("Top-Left"), Input::Move(0));
        assert_eq!(parse_input("START"), Input::Start);
        assert_eq!(parse_input("reset-scores"), Input::ScoreReset);
        assert_eq!(parse_input("dance"), Input::Unknown("dance".to_string()));
    }
}
