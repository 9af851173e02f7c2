//! Wellguard CLI
//!
//! Usage:
//!   wellguard --text "your text here"                 # Single evaluation
//!   wellguard --text "..." --subject student-42       # Screen as a mood entry
//!   wellguard --interactive                           # Live preview per line
//!   wellguard --serve                                 # HTTP API server
//!   wellguard --text "text" --json                    # JSON output

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use wellguard::config::Settings;
use wellguard::core::{run_server, AlertDelivery, CrisisMonitor};
use wellguard::types::{RiskBand, ScoreOutput, ScoreResult};
use wellguard::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "wellguard",
    version = VERSION,
    about = "Wellguard - crisis-risk screening for mood journals",
    long_about = "Wellguard scores free text for self-harm and crisis risk on a 0-10\n\
                  scale, suggests next steps and raises counselor alerts.\n\n\
                  Modes:\n  \
                  --text         Score one text (add --subject to screen it as an entry)\n  \
                  --interactive  Live preview, one line at a time\n  \
                  --serve        HTTP API server mode\n\n\
                  Bands:\n  \
                  CRISIS   - 9-10, immediate support\n  \
                  ELEVATED - 7-8, counselor follow-up\n  \
                  MODERATE - 5-6, coping strategies\n  \
                  MILD     - 3-4, self-care\n  \
                  STABLE   - 0-2"
)]
struct Args {
    /// Text to evaluate (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Screen --text as a mood entry by this subject and store any alert
    #[arg(long, requires = "text")]
    subject: Option<String>,

    /// Interactive mode - read lines from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (overrides config)
    #[arg(long)]
    addr: Option<String>,

    /// Config file (default: ./wellguard.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Alert directory for the json store (overrides config)
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show matched keywords and suggestions, enable debug logs
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(addr) = &args.addr {
        settings.server.addr = addr.clone();
    }
    if let Some(dir) = &args.store_dir {
        settings.store.dir = dir.clone();
    }

    if args.serve {
        print_header("API Server", args.no_color);
        return run_server(&settings).await.context("Server error");
    }

    let monitor = settings.build_monitor().context("Failed to build crisis monitor")?;

    match (&args.text, &args.subject) {
        (Some(text), Some(subject)) => run_entry(&monitor, subject, text, &args).await,
        (Some(text), None) => {
            run_single(&monitor, text, &args);
            Ok(())
        }
        _ => run_interactive(&monitor, &args),
    }
}

/// Logs go to stderr so --json output stays clean
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

/// Run single text evaluation
fn run_single(monitor: &CrisisMonitor, text: &str, args: &Args) {
    let result = monitor.scorer().score(text);
    let alert_recommended = monitor.sink().should_alert(&result);
    print_output(&ScoreOutput::new(result, alert_recommended), args);
}

/// Screen one mood entry and report the alert outcome
async fn run_entry(monitor: &CrisisMonitor, subject: &str, text: &str, args: &Args) -> Result<()> {
    let outcome = monitor.submit_entry(subject, text).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let alert_recommended = !matches!(outcome.alert, AlertDelivery::NotRaised);
    print_output(&ScoreOutput::new(outcome.result.clone(), alert_recommended), args);
    match &outcome.alert {
        AlertDelivery::NotRaised => {}
        AlertDelivery::Delivered { alert_id } => println!("  alert stored: {}", alert_id),
        AlertDelivery::Queued { alert_id } => {
            match monitor.spool() {
                Some(spool) => println!(
                    "  alert store unavailable, alert {} kept in {}",
                    alert_id,
                    spool.display()
                ),
                None => println!("  alert store unavailable, alert {} NOT persisted", alert_id),
            }
            anyhow::bail!("crisis alert could not be stored");
        }
    }
    println!("  {}", outcome.reason);
    Ok(())
}

/// Run interactive live-preview mode
fn run_interactive(monitor: &CrisisMonitor, args: &Args) -> Result<()> {
    print_header("Live Preview", args.no_color);
    println!("Type how you are feeling and press Enter. Type 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nTake care.");
            break;
        }

        match monitor.preview(line) {
            Some(result) => {
                let crisis_flow = monitor.sink().crisis_flow(&result);
                print_output(&ScoreOutput::new(result, crisis_flow), args);
            }
            None => println!("  (keep typing...)"),
        }
    }
    Ok(())
}

fn print_output(output: &ScoreOutput, args: &Args) {
    if args.json {
        println!("{}", serde_json::to_string(output).unwrap_or_default());
        return;
    }

    if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
    }

    if args.verbose {
        print_verbose(&output.result, output.band, args.no_color);
    } else if output.band == RiskBand::Crisis {
        // Crisis resources are always shown
        print_suggestions(&output.result, output.band, args.no_color);
    }
}

/// Print matched keywords and suggestions
fn print_verbose(result: &ScoreResult, band: RiskBand, no_color: bool) {
    let color = if no_color { "" } else { "\x1b[90m" };
    let reset = if no_color { "" } else { RiskBand::color_reset() };
    if result.matched_keywords.is_empty() {
        println!("{}  matched: (none){}", color, reset);
    } else {
        println!("{}  matched: {}{}", color, result.matched_keywords.join(", "), reset);
    }
    print_suggestions(result, band, no_color);
}

fn print_suggestions(result: &ScoreResult, band: RiskBand, no_color: bool) {
    let color = if no_color { "" } else { band.color_code() };
    let reset = if no_color { "" } else { RiskBand::color_reset() };
    for suggestion in &result.suggestions {
        println!("{}  • {}{}", color, suggestion, reset);
    }
}

/// Print header
fn print_header(mode: &str, no_color: bool) {
    if no_color {
        println!("========================================");
        println!("  Wellguard v{} - {}", VERSION, mode);
        println!("========================================");
    } else {
        println!("\x1b[1m========================================\x1b[0m");
        println!("\x1b[1m  Wellguard v{} - {}\x1b[0m", VERSION, mode);
        println!("\x1b[1m========================================\x1b[0m");
    }
    println!();
}
