use anyhow::Context;
use clap::Parser;
use connfinder::config::{DEFAULT_TRIGGER_COLOR, FinderConfig};
use connfinder::insight::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, MAX_TOKENS};
use connfinder::{ConnectionAnalyzer, INSIGHTS_LABEL, UiSurface};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "connfinder", about = "Employee connection finder")]
struct Args {
    /// Bearer credential for the completion endpoint.
    #[arg(long, env = "CONNFINDER_API_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "CONNFINDER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Color submitted by the trigger.
    #[arg(long, default_value = DEFAULT_TRIGGER_COLOR)]
    color: String,

    /// Simulated round-trip wait before metrics are produced.
    #[arg(long, env = "CONNFINDER_FETCH_DELAY_MS", default_value_t = 1_000)]
    fetch_delay_ms: u64,

    #[arg(long, env = "CONNFINDER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    #[arg(long, default_value_t = MAX_TOKENS)]
    max_tokens: u32,

    /// Fixed seed for the metrics noise.
    #[arg(long, env = "CONNFINDER_SEED")]
    seed: Option<u64>,

    /// Print the outcome summary as JSON instead of the label text.
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn config(&self) -> FinderConfig {
        let mut cfg = FinderConfig::new(self.api_key.clone())
            .with_endpoint(self.endpoint.clone())
            .with_fetch_delay(Duration::from_millis(self.fetch_delay_ms))
            .with_timeout(Duration::from_secs(self.timeout_secs));
        cfg.insight.max_tokens = self.max_tokens;
        if let Some(seed) = self.seed {
            cfg = cfg.with_seed(seed);
        }
        cfg
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if args.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).with_writer(std::io::stderr).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }

    // The main thread owns the surface; the action runs elsewhere and posts back.
    let (mut surface, ui) = UiSurface::with_insights_label();
    let analyzer = ConnectionAnalyzer::new(args.config(), ui).context("building analyzer")?;
    let action = analyzer.trigger(&args.color).context("starting action")?;
    drop(analyzer);

    surface.run().context("applying ui commands")?;

    let label = surface.label(INSIGHTS_LABEL).cloned().unwrap_or_default();
    match action.join() {
        Ok(outcome) if args.json => {
            println!("{}", serde_json::to_string_pretty(&outcome.summary())?);
        }
        Ok(_) => println!("{}", label.text),
        Err(err) => {
            eprintln!("{}", label.text);
            return Err(err).context("analysis failed");
        }
    }
    Ok(())
}
