//! Stock advisor command line
//!
//! # Usage
//!
//! ```bash
//! # Put the key in .env or export it
//! export ANTHROPIC_API_KEY="sk-ant-..."
//!
//! # Dashboard on http://127.0.0.1:8501
//! cargo run --bin stock-advisor -- serve
//!
//! # One analysis in the terminal
//! cargo run --bin stock-advisor -- analyze --ticker AAPL --mode investor --persona lynch
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Color, Table, presets::UTF8_FULL};
use stock_advisor::engine::{AnalysisMode, AnalysisRequest, Persona, StockAdvisor};
use stock_advisor::indicators::trend_signals;
use stock_advisor::metrics::{MetricStatus, key_metrics};
use stock_advisor::{AdvisorConfig, MarketSnapshot, StockData, dashboard};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stock-advisor")]
#[command(about = "AI stock analysis in the style of famous investors", long_about = None)]
struct Cli {
    /// Dotenv file holding ANTHROPIC_API_KEY
    #[arg(long, global = true, default_value = ".env")]
    env_file: String,

    /// Model name override
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web dashboard
    Serve {
        /// Listen address, e.g. 0.0.0.0:8501
        #[arg(long)]
        addr: Option<String>,
    },
    /// Fetch data and print an analysis
    Analyze {
        #[arg(short, long)]
        ticker: String,
        /// investor, intrinsic, technical, elliott or market
        #[arg(short, long, default_value = "investor")]
        mode: AnalysisMode,
        /// buffett, lynch, munger, dalio or wood
        #[arg(short, long, default_value = "buffett")]
        persona: Persona,
        /// Print the model text without HTML styling
        #[arg(long)]
        raw: bool,
    },
    /// Print the prompt that would be sent, without calling the model
    Prompt {
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long, default_value = "investor")]
        mode: AnalysisMode,
        #[arg(short, long, default_value = "buffett")]
        persona: Persona,
    },
    /// Print the market basket returns
    Market,
}

fn metrics_table(data: &StockData) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Value", "Status"]);

    for card in key_metrics(&data.snapshot) {
        let color = match card.status {
            MetricStatus::Positive => Color::Green,
            MetricStatus::Negative => Color::Red,
            MetricStatus::Neutral => Color::Grey,
        };
        table.add_row(vec![
            Cell::new(card.label),
            Cell::new(&card.display),
            Cell::new(card.status_label).fg(color),
        ]);
    }
    table
}

fn market_table(market: &MarketSnapshot) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Symbol", "Name", "Return"]);

    let indices = [
        ("SPY", "S&P 500", market.spy),
        ("QQQ", "Nasdaq 100", market.qqq),
        ("IWM", "Russell 2000", market.iwm),
    ];
    for (symbol, name, value) in indices {
        table.add_row(vec![
            symbol.to_string(),
            name.to_string(),
            MarketSnapshot::format_return(value),
        ]);
    }
    table.add_row(vec![
        "^VIX".to_string(),
        "Volatility index".to_string(),
        market.vix_display(),
    ]);
    for (sector, value) in &market.sectors {
        table.add_row(vec![
            sector.etf_ticker().to_string(),
            sector.name().to_string(),
            MarketSnapshot::format_return(*value),
        ]);
    }
    table
}

fn print_overview(data: &StockData) -> anyhow::Result<()> {
    println!("{} ({})", data.snapshot.display_name(), data.snapshot.ticker);
    if let Some(price) = data.snapshot.current_price.or_else(|| data.history.last_close()) {
        println!("Price: ${price:.2}");
    }
    println!("{}", metrics_table(data));

    if let Some(signals) = trend_signals(&data.history)? {
        println!("{}", signals.ma50.describe("MA50"));
        println!("{}", signals.ma200.describe("MA200"));
        if let Some(cross) = signals.cross {
            println!("{}", cross.message());
        }
    }
    println!();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    advisor_utils::init_tracing();

    let cli = Cli::parse();

    let config = AdvisorConfig::from_env(&cli.env_file)
        .context("Failed to load configuration")?
        .with_overrides(cli.model, None);

    match cli.command {
        Command::Serve { addr } => {
            let config = config.with_overrides(None, addr);
            let addr = config.socket_addr()?;
            let advisor = Arc::new(StockAdvisor::from_config(config)?);
            dashboard::serve(advisor, addr).await?;
        }
        Command::Analyze {
            ticker,
            mode,
            persona,
            raw,
        } => {
            let advisor = StockAdvisor::from_config(config)?;
            let ticker = StockAdvisor::normalize_ticker(&ticker)?;
            let data = advisor.load_stock(&ticker).await?;
            print_overview(&data)?;

            let request = AnalysisRequest::new(ticker, mode).with_persona(persona);
            let analysis = advisor.analyze(&request, &data).await?;
            info!("{}", analysis.summary());

            println!("{}\n", analysis.title);
            if raw {
                println!("{}", analysis.raw_text);
            } else {
                println!("{}", analysis.formatted);
            }
        }
        Command::Prompt {
            ticker,
            mode,
            persona,
        } => {
            let advisor = StockAdvisor::from_config(config)?;
            let ticker = StockAdvisor::normalize_ticker(&ticker)?;
            let data = advisor.load_stock(&ticker).await?;

            let request = AnalysisRequest::new(ticker, mode).with_persona(persona);
            println!("{}", advisor.build_prompt(&request, &data).await?);
        }
        Command::Market => {
            let advisor = StockAdvisor::from_config(config)?;
            println!("{}", market_table(&advisor.market_snapshot().await));
        }
    }

    Ok(())
}
