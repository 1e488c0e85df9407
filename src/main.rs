//! Sentiment Tracker CLI
//!
//! Usage:
//!   sentiment-tracker -m "first message" -m "second message"   # Analyze messages
//!   sentiment-tracker --file chat.json --mode predict         # From a file
//!   sentiment-tracker --interactive                           # One message per line
//!   sentiment-tracker --serve --store ./store.json            # HTTP API server
//!   sentiment-tracker -m "text" --json                        # JSON output

use clap::{Parser, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use sentiment_tracker::core::{
    default_customer_id, run_server, ActionPredictor, AnalysisStore, AppState, LexiconConfig,
    SignalDetector, TrajectoryAnalyzer,
};
use sentiment_tracker::error::Result;
use sentiment_tracker::types::{
    ActionPrediction, AnalysisRecord, ContextType, Message, RawMessage, RiskAssessment, Trajectory,
};
use sentiment_tracker::VERSION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Sentiment trajectory only
    Analyze,
    /// Risk signals only
    Signals,
    /// Next-action prediction only
    Predict,
    /// All three
    All,
}

#[derive(Parser, Debug)]
#[command(
    name = "sentiment-tracker",
    version = VERSION,
    about = "Track conversation sentiment, detect risk signals and predict the next action",
    long_about = "Scores each message of a conversation, follows how sentiment moves,\n\
                  flags competitor, frustration, disengagement and price signals, and\n\
                  predicts what the other side will do next.\n\n\
                  Modes:\n  \
                  --mode analyze   Sentiment trajectory\n  \
                  --mode signals   Risk signals\n  \
                  --mode predict   Next-action prediction\n  \
                  --mode all       Everything (default)\n\n\
                  Contexts:\n  \
                  customer, employee, email, investor, general"
)]
struct Args {
    /// Message text; repeat for a conversation
    #[arg(short, long)]
    message: Vec<String>,

    /// JSON array of messages, or plain text with one message per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// What to run
    #[arg(long, value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Relationship context (unknown tags fall back to customer)
    #[arg(short, long, default_value = "customer")]
    context: String,

    /// Interactive mode - re-analyze the whole conversation after each line
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// JSON file backing the analysis store
    #[arg(long)]
    store: Option<PathBuf>,

    /// Customer id used when recording CLI analyses in the store
    #[arg(long)]
    customer: Option<String>,

    /// JSON lexicon overrides
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Debug logging and full detail
    #[arg(long)]
    verbose: bool,
}

/// Analyzers built once from the lexicon configuration
struct Analyzers {
    trajectory: TrajectoryAnalyzer,
    signals: SignalDetector,
    predictor: ActionPredictor,
}

impl Analyzers {
    fn from_config(config: &LexiconConfig) -> Self {
        Self {
            trajectory: config.trajectory_analyzer(),
            signals: config.signal_detector(),
            predictor: config.action_predictor(),
        }
    }
}

/// Everything one run produced
#[derive(Debug, Default, Serialize)]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    sentiment: Option<Trajectory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signals: Option<RiskAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction: Option<ActionPrediction>,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(log_filter(rust_log.as_deref(), Level::DEBUG))
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(log_filter(rust_log.as_deref(), Level::INFO))
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match &args.lexicon {
        Some(path) => LexiconConfig::from_json_file(path)?,
        None => LexiconConfig::default(),
    };
    let context = ContextType::parse_or(&args.context, ContextType::Customer);

    if args.serve {
        let store = match &args.store {
            Some(path) => AnalysisStore::open(path)?,
            None => AnalysisStore::new(),
        };
        let state = AppState::new(store, args.store.clone()).with_analyzers(
            config.trajectory_analyzer(),
            config.signal_detector(),
            config.action_predictor(),
        );
        print_banner(&args.addr);
        run_server(&args.addr, state).await?;
        return Ok(());
    }

    let analyzers = Analyzers::from_config(&config);

    if args.interactive {
        run_interactive(&analyzers, context, &args)?;
        return Ok(());
    }

    let mut raw: Vec<RawMessage> = args.message.iter().cloned().map(RawMessage::from).collect();
    if let Some(path) = &args.file {
        raw.extend(read_messages(path)?);
    }
    let messages = Message::resolve_all(raw);

    if messages.is_empty() {
        eprintln!("No messages given. Use --message, --file or --interactive (see --help).");
        std::process::exit(2);
    }

    let report = run_report(&analyzers, &messages, context, args.mode);
    if let Some(path) = &args.store {
        record_report(path, args.customer.as_deref(), context, &messages, &report)?;
    }
    print_report(&report, &args)?;
    Ok(())
}

/// Run the selected analyses over the whole conversation
/// `RUST_LOG` directives when set, else everything at `default` and above
fn log_filter(directives: Option<&str>, default: Level) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::from_level(default).into()))
}

fn run_report(analyzers: &Analyzers, messages: &[Message], context: ContextType, mode: Mode) -> Report {
    let wants = |m: Mode| mode == Mode::All || mode == m;
    Report {
        sentiment: wants(Mode::Analyze).then(|| analyzers.trajectory.analyze(messages)),
        signals: wants(Mode::Signals).then(|| analyzers.signals.detect(messages, context)),
        prediction: wants(Mode::Predict).then(|| analyzers.predictor.predict(messages, context)),
    }
}

/// Read a message file: a JSON array of wire messages, else one message per line
fn read_messages(path: &Path) -> Result<Vec<RawMessage>> {
    let content = std::fs::read_to_string(path)?;
    if let Ok(raw) = serde_json::from_str::<Vec<RawMessage>>(&content) {
        return Ok(raw);
    }
    tracing::debug!("{} is not a JSON array, reading one message per line", path.display());
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(RawMessage::from)
        .collect())
}

/// Append the most specific result of a run to the store file
fn record_report(
    path: &Path,
    customer: Option<&str>,
    context: ContextType,
    messages: &[Message],
    report: &Report,
) -> Result<()> {
    let record = if let Some(p) = &report.prediction {
        AnalysisRecord::from(p)
    } else if let Some(s) = &report.signals {
        AnalysisRecord::from(s)
    } else if let Some(t) = &report.sentiment {
        AnalysisRecord::from(t)
    } else {
        return Ok(());
    };

    let customer_id = customer
        .map(str::to_string)
        .unwrap_or_else(|| default_customer_id(messages));
    let mut store = AnalysisStore::open(path)?;
    let id = store.save_analysis(&customer_id, context, messages, &record);
    store.save_to_file(path)?;
    tracing::info!("Recorded analysis {} for {} in {}", id, customer_id, path.display());
    Ok(())
}

/// Interactive mode: each line extends the conversation
fn run_interactive(analyzers: &Analyzers, context: ContextType, args: &Args) -> Result<()> {
    print_header("Interactive Mode", args.no_color);
    println!("Type one message per line. The whole conversation is re-analyzed each time.");
    println!("Type 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut messages: Vec<Message> = Vec::new();

    loop {
        print!("[{} messages] > ", messages.len());
        stdout.flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended. Messages: {}", messages.len());
            break;
        }
        if line.is_empty() {
            continue;
        }

        messages.push(Message::at(messages.len(), line));
        let report = run_report(analyzers, &messages, context, args.mode);
        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_report(&report, args)?;
        }
    }

    Ok(())
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_report(report: &Report, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if args.no_color && !args.verbose {
        if let Some(t) = &report.sentiment {
            println!("{}", t.to_parseable_string());
        }
        if let Some(s) = &report.signals {
            println!("{}", s.to_parseable_string());
        }
        if let Some(p) = &report.prediction {
            println!("{}", p.to_parseable_string());
        }
        return Ok(());
    }

    if let Some(t) = &report.sentiment {
        print_trajectory(t, args.verbose);
    }
    if let Some(s) = &report.signals {
        print_signals(s, args.verbose);
    }
    if let Some(p) = &report.prediction {
        print_prediction(p);
    }
    Ok(())
}

fn print_trajectory(t: &Trajectory, verbose: bool) {
    println!("{}", "Sentiment".bold());
    if t.is_empty() {
        println!("  {}", t.interpretation.dimmed());
        println!();
        return;
    }
    let state = sentiment_tracker::types::SentimentState::from_score(t.current_sentiment);
    println!(
        "  {} current {:.1} ({}) | initial {:.1} | change {:+.1} | trend {}",
        state.emoji(),
        t.current_sentiment,
        state.to_string().color(state.color()),
        t.initial_sentiment,
        t.overall_change,
        t.trend
    );
    if verbose {
        for point in &t.timeline {
            println!(
                "  {:>3}. {:>6.2}  {}  {}",
                point.message_index,
                point.sentiment_score,
                point.sentiment_state.to_string().color(point.sentiment_state.color()),
                point.text.dimmed()
            );
        }
    }
    for tp in &t.turning_points {
        println!(
            "  {} {} -> {} at {} ({:.1}, {:?})",
            "turning point:".yellow(),
            tp.from_state,
            tp.to_state,
            tp.timestamp,
            tp.change_magnitude,
            tp.severity
        );
    }
    if t.has_critical_shift() {
        println!("  {}", "critical sentiment shift in this conversation".red().bold());
    }
    println!("  {}", t.interpretation.italic());
    println!();
}

fn print_signals(s: &RiskAssessment, verbose: bool) {
    println!("{}", "Risk signals".bold());
    println!(
        "  risk {} ({}) | confidence {}% | breaking point {}",
        s.risk_level.to_string().color(s.risk_level.color()),
        s.total_risk_score,
        s.confidence,
        s.breaking_point
            .map(|bp| format!("message {}", bp))
            .unwrap_or_else(|| "none".to_string())
    );
    if verbose {
        for m in &s.signals {
            let kinds: Vec<&str> = m.signals.iter().map(|h| h.text.as_str()).collect();
            println!("  {:>3}. risk {:>3}  {}", m.message_index, m.risk_score, kinds.join(", ").dimmed());
        }
    }
    if !s.key_phrases.is_empty() {
        println!("  key phrases: {}", s.key_phrases.join(", "));
    }
    for r in &s.recommendations {
        println!("  - {}", r);
    }
    println!();
}

fn print_prediction(p: &ActionPrediction) {
    println!("{}", "Prediction".bold());
    println!(
        "  {} | confidence {:.1}% | {} | urgency {} | success {:.0}%",
        p.action.to_string().bold(),
        p.confidence,
        p.timeline,
        p.urgency.to_string().color(p.urgency.color()),
        p.success_rate
    );
    for i in &p.interventions {
        println!("  - {}", i);
    }
    println!("  {}", p.explanation.italic());
    println!();
}

fn print_header(mode: &str, no_color: bool) {
    let title = format!("Sentiment Tracker v{} - {}", VERSION, mode);
    println!("========================================");
    if no_color {
        println!("  {}", title);
    } else {
        println!("  {}", title.bold());
    }
    println!("========================================");
    println!();
}

fn print_banner(addr: &str) {
    println!();
    println!("========================================");
    println!("  Sentiment Tracker API Server");
    println!("  Version: {}", VERSION);
    println!("  Listening on {}", addr);
    println!("========================================");
    println!();
}
