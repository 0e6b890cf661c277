//! Kalshi swipe-voting client entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kalshi_swipe::api::{create_router, AppState};
use kalshi_swipe::balance;
use kalshi_swipe::broker::BrokerClient;
use kalshi_swipe::config::Config;
use kalshi_swipe::market::{self, series_for, Category, Market, VoteDirection, CATALOG};
use kalshi_swipe::metrics;
use kalshi_swipe::session::{SessionPhase, SwipeSession};

/// Kalshi swipe-voting client.
#[derive(Parser, Debug)]
#[command(name = "kalshi-swipe")]
#[command(about = "Swipe through Kalshi sports markets, voting yes or no")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Market category (nba, nfl, mlb, nhl, cfb, mixed).
    #[arg(short, long)]
    category: Option<String>,

    /// HTTP server port for health/metrics.
    #[arg(short, long, default_value = "8080")]
    port: u16,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the interactive swipe session (default).
    Run {
        /// Market category (nba, nfl, mlb, nhl, cfb, mixed).
        #[arg(short, long)]
        category: Option<String>,

        /// HTTP server port for health/metrics.
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Check account balance and broker connection.
    CheckBalance,

    /// Resolve and print the market listing for a category.
    ListMarkets {
        /// Market category (nba, nfl, mlb, nhl, cfb, mixed).
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Print the category catalog.
    Categories,

    /// Derive a display question from a raw market ticker (diagnostic).
    ParseTicker {
        /// Raw market ticker, e.g. KXNBAGAME-25OCT30MIASAS-SAS.
        ticker: String,

        /// Market title, used as the fallback question.
        #[arg(short, long)]
        title: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("kalshi_swipe=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::CheckBalance) => cmd_check_balance().await,
        Some(Command::ListMarkets { category }) => cmd_list_markets(category).await,
        Some(Command::Categories) => cmd_categories(),
        Some(Command::ParseTicker { ticker, title }) => cmd_parse_ticker(&ticker, title.as_deref()),
        Some(Command::Run { category, port }) => cmd_run(category, port).await,
        None => cmd_run(args.category, args.port).await,
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("KALSHI SWIPE - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Check credentials
    print!("Checking credentials... ");
    match config.credentials() {
        Some(_) => println!("OK (live orders enabled)"),
        None => println!("ABSENT (sample markets only, no orders)"),
    }

    // Show configuration summary
    let category = Category::from_id(&config.category);
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Broker URL: {}", config.broker_url_trimmed());
    println!("  Category: {} ({})", category.id, category.display_name);
    println!("  Series: {}", series_for(category.id));
    println!("  Market Limit: {}", config.market_limit);
    println!("  Order Count: {} contract(s) per vote", config.order_count);
    println!("  Advance Delay: {}ms", config.advance_delay_ms);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Check account balance and broker connection.
async fn cmd_check_balance() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("KALSHI SWIPE - BALANCE CHECK");
    println!("======================================================================");

    // Load configuration
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let credentials = config
        .credentials()
        .ok_or_else(|| anyhow::anyhow!("KALSHI_API_KEY and KALSHI_PRIVATE_KEY must be set"))?;

    println!("Broker: {}", config.broker_url_trimmed());
    println!("API Key: present");
    println!("======================================================================");

    // Create client
    print!("\n1. Creating client... ");
    let client = BrokerClient::new(&config);
    println!("OK");

    // Get balance
    print!("\n2. Fetching balance... ");
    match balance::fetch(&client, &credentials).await {
        Ok(balance) => {
            println!("OK");
            println!("   Balance: ${:.2}", balance);
        }
        Err(e) => {
            println!("FAILED");
            println!("   Error: {}", e);
        }
    }

    println!("\n======================================================================");
    println!("BALANCE CHECK COMPLETED");
    println!("======================================================================");

    Ok(())
}

/// Resolve and print the market listing for a category.
async fn cmd_list_markets(category_override: Option<String>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("KALSHI SWIPE - MARKET LISTING");
    println!("======================================================================");

    let mut config = Config::load()?;
    if let Some(category) = category_override {
        config.category = category;
    }
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let category = Category::from_id(&config.category);
    let client = BrokerClient::new(&config);
    let credentials = config.credentials();

    println!("Category: {} ({})", category.id, category.display_name);
    println!("Series: {}", series_for(category.id));
    println!();

    let resolution =
        market::resolve(&client, &category, credentials.as_ref(), config.market_limit).await;

    println!("Source: {}", resolution.source);
    if let Some(e) = &resolution.error {
        println!("Fallback reason: {}", e);
    }
    println!("----------------------------------------------------------------------");

    for (i, m) in resolution.markets.iter().enumerate() {
        println!("{:>3}. [{:>3}c] {}", i + 1, m.price_cents().round(), m.question);
        if let Some(ticker) = &m.ticker {
            println!("         {}", ticker);
        }
    }

    println!("======================================================================");
    println!("{} market(s)", resolution.markets.len());
    println!("======================================================================");

    Ok(())
}

/// Print the category catalog.
fn cmd_categories() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("KALSHI SWIPE - CATEGORIES");
    println!("======================================================================");

    for category in CATALOG {
        println!(
            "  {:<8} {:<24} series: {}",
            category.id,
            category.display_name,
            series_for(category.id)
        );
    }

    println!("======================================================================");

    Ok(())
}

/// Derive a display question from a raw market ticker.
fn cmd_parse_ticker(ticker: &str, title: Option<&str>) -> anyhow::Result<()> {
    let parsed = market::ticker::parse(ticker, title);

    println!("Ticker:     {}", ticker);
    println!("Question:   {}", parsed.question);
    if !parsed.team_name.is_empty() {
        println!("Team:       {}", parsed.team_name);
    }
    if !parsed.match_info.is_empty() {
        println!("Match:      {}", parsed.match_info);
    }

    Ok(())
}

/// Run the interactive swipe session.
async fn cmd_run(category_override: Option<String>, port: u16) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(category) = category_override {
        config.category = category;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let category = Category::from_id(&config.category);
    info!("Configuration loaded successfully");
    info!("Category: {} ({})", category.id, category.display_name);
    info!(
        "Mode: {}",
        if config.credentials().is_some() {
            "LIVE (votes place orders)"
        } else {
            "SAMPLE (no credentials, no orders)"
        }
    );

    // Install metrics recorder
    let prometheus = PrometheusBuilder::new().install_recorder()?;
    metrics::init_metrics();

    // Create app state
    let app_state = AppState::new(category.id).with_prometheus(prometheus);

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(app_state.clone());

    // Spawn HTTP server
    let _server_handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    // Create broker client and session
    let client = Arc::new(BrokerClient::new(&config));
    let mut session = SwipeSession::new(&config, Arc::clone(&client));

    // Fetch balance in the background; display is best-effort
    if let Some(credentials) = config.credentials() {
        let client = Arc::clone(&client);
        let state = app_state.clone();
        tokio::spawn(async move {
            match balance::fetch(&client, &credentials).await {
                Ok(balance) => {
                    info!("Account balance: ${:.2}", balance);
                    state.set_balance(balance).await;
                }
                Err(e) => {
                    warn!("Balance fetch failed: {}", e);
                }
            }
        });
    }

    // Resolve the market deck
    let generation = session.begin_loading();
    let credentials = config.credentials();
    let resolution =
        market::resolve(&client, &category, credentials.as_ref(), config.market_limit).await;

    if let Some(e) = &resolution.error {
        warn!("Live listing unavailable, using samples: {}", e);
    }

    session.apply_resolution(generation, resolution);
    app_state.set_ready(true);
    app_state.set_snapshot(session.snapshot()).await;

    // Interactive loop
    println!("========================================");
    println!("KALSHI SWIPE - {}", category.display_name.to_uppercase());
    println!("========================================");
    println!("Commands: [y]es  [n]o  [s]kip  [r]eset  [q]uit");
    println!("========================================");

    render(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => {
                session.vote(VoteDirection::Yes).await;
            }
            "n" | "no" => {
                session.vote(VoteDirection::No).await;
            }
            "s" | "skip" => {
                session.skip();
            }
            "r" | "reset" => match session.reset() {
                Some(generation) => {
                    let resolution = market::resolve(
                        &client,
                        &category,
                        credentials.as_ref(),
                        config.market_limit,
                    )
                    .await;
                    session.apply_resolution(generation, resolution);
                }
                None => {
                    println!("Reset is only available after the last market.");
                    continue;
                }
            },
            "q" | "quit" | "exit" => break,
            "" => continue,
            other => {
                println!("Unknown command: {:?}. Use y/n/s/r/q.", other);
                continue;
            }
        }

        app_state.set_snapshot(session.snapshot()).await;
        render(&session);

        if session.phase() == SessionPhase::Complete {
            // Stay in the loop so the user can reset or quit
            continue;
        }
    }

    print_summary(&session);

    Ok(())
}

/// Print the current card, or the summary when the deck is exhausted.
fn render(session: &SwipeSession) {
    match session.phase() {
        SessionPhase::Active => {
            if let Some(market) = session.current_market() {
                print_card(session, market);
            }
        }
        SessionPhase::Complete => {
            print_summary(session);
            println!("[r]eset to run the deck again, [q]uit to exit.");
        }
        SessionPhase::Loading => {}
    }
}

/// Print a single market card.
fn print_card(session: &SwipeSession, market: &Market) {
    let summary = session.summary();

    println!();
    println!(
        "[{}/{}] {}",
        session.cursor() + 1,
        summary.total_markets,
        market.question
    );
    if let Some(match_info) = &market.match_info {
        println!("       {}", match_info);
    }
    println!(
        "       price: {}c   {}",
        market.price_cents().round(),
        if market.is_live() { "live" } else { "sample" }
    );
    print!("> ");
    use std::io::Write;
    let _ = std::io::stdout().flush();
}

/// Print the end-of-session summary.
fn print_summary(session: &SwipeSession) {
    let summary = session.summary();

    println!();
    println!("========================================");
    println!("SESSION SUMMARY");
    println!("========================================");
    println!("Markets: {} ({})", summary.total_markets, summary.source);
    println!("Yes votes: {}", summary.tally.yes);
    println!("No votes: {}", summary.tally.no);
    println!("Skipped: {}", summary.skipped);
    println!("========================================");
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
