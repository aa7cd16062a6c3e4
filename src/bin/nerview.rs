//! nerview — CellStrat Hub NER client
//!
//! Warms a hosted model up, runs inference, and renders the annotated
//! entities as colored badges in the terminal.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Input, Password};
use tokio::sync::watch;

use nerview::render;
use nerview::session::{Effect, Event, Session, Status};
use nerview::{CallOptions, Config, EntityLabel, HubClient, Secrets};

/// Nerview CLI client
#[derive(Parser)]
#[command(name = "nerview")]
#[command(version = nerview::PKG_VERSION)]
#[command(about = "CellStrat Hub NER client and annotation viewer")]
struct Args {
    /// Endpoint suffix appended to the fixed Hub prefix
    /// (typically `<username>/<api-name>`)
    #[arg(short, long, env = "HUB_ENDPOINT")]
    endpoint: Option<String>,

    /// Hub API key
    #[arg(long, env = "HUB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Config file path (default: ~/.nerview/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Warm the endpoint's model into memory
    Warmup,

    /// Run inference and render the annotated entities
    Predict {
        /// Text to annotate (or omit to read from stdin)
        text: Option<String>,
    },

    /// Show the label taxonomy with badge colors
    Labels,

    /// Interactive session: prompt for anything missing, then annotate
    /// lines of input
    Interactive,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    // Needs no endpoint or key
    if let Command::Labels = args.command {
        print_labels();
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;
    let timeout = Duration::from_secs(args.timeout_secs.unwrap_or(config.client.timeout_secs));

    match args.command {
        Command::Warmup => {
            let client = build_client(&args, &config, &secrets, timeout, false)?;
            let mut session = Session::new();
            if !run_warmup(&client, &mut session).await {
                process::exit(1);
            }
        }

        Command::Predict { ref text } => {
            let text = resolve_text(text.clone(), "predict")?;
            let client = build_client(&args, &config, &secrets, timeout, false)?;
            let mut session = Session::new();
            if !run_predict(&client, &mut session, &text).await {
                process::exit(1);
            }
        }

        Command::Interactive => interactive(&args, &config, &secrets, timeout).await?,

        Command::Labels => unreachable!("handled above"),
    }

    Ok(())
}

/// Build a client from flags, config, and secrets.
///
/// When `prompt` is set, missing values are asked for interactively;
/// otherwise they are errors.
fn build_client(
    args: &Args,
    config: &Config,
    secrets: &Secrets,
    timeout: Duration,
    prompt: bool,
) -> Result<HubClient, Box<dyn std::error::Error>> {
    let suffix = match args
        .endpoint
        .clone()
        .or_else(|| config.endpoint.suffix.clone())
    {
        Some(suffix) => suffix,
        None if prompt => Input::new()
            .with_prompt("endpoint suffix (username/api-name)")
            .interact_text()?,
        None => {
            return Err(
                "no endpoint configured (pass --endpoint, set HUB_ENDPOINT, \
                 or set [endpoint] suffix in the config file)"
                    .into(),
            );
        }
    };

    let api_key = match args.api_key.clone().or_else(|| secrets.api_key()) {
        Some(key) => key,
        None if prompt => Password::new().with_prompt("hub api key").interact()?,
        None => {
            return Err(
                "no API key configured (pass --api-key, set HUB_API_KEY, \
                 or add it to the secrets file)"
                    .into(),
            );
        }
    };

    Ok(HubClient::new(&suffix, api_key).timeout(timeout))
}

/// Interactive loop: one warm-up offer, then annotate lines until `:quit`.
async fn interactive(
    args: &Args,
    config: &Config,
    secrets: &Secrets,
    timeout: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("nerview {}", nerview::PKG_VERSION);
    println!("endpoint prefix: {}", nerview::HUB_URL_PREFIX);

    let client = build_client(args, config, secrets, timeout, true)?;
    let mut session = Session::new();

    let warm = Confirm::new()
        .with_prompt("warm the model up first?")
        .default(true)
        .interact()
        .unwrap_or(false);
    if warm {
        run_warmup(&client, &mut session).await;
    }

    println!("enter text to annotate (:warmup reloads, :labels lists tags, :quit exits)");
    loop {
        let line: String = Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()?;

        match line.trim() {
            "" => continue,
            ":quit" | ":q" => break,
            ":warmup" => {
                run_warmup(&client, &mut session).await;
            }
            ":labels" => print_labels(),
            text => {
                run_predict(&client, &mut session, text).await;
            }
        }
    }

    Ok(())
}

/// Drive one warm-up call through the session reducer.
///
/// Returns false when the warm-up failed; the failure is already printed.
async fn run_warmup(client: &HubClient, session: &mut Session) -> bool {
    session.apply(Event::WarmupStarted);
    eprintln!("{}", session.status());

    let result = client.warm_up(&cancellable()).await;
    let elapsed = result.as_ref().map(|report| report.elapsed).ok();
    session.apply(Event::WarmupFinished(result));

    match session.status() {
        Status::WarmupFailed(_) => {
            eprintln!("{}", session.status().to_string().red());
            false
        }
        _ => {
            println!(
                "{} ({:.1}s)",
                session.status(),
                elapsed.unwrap_or_default().as_secs_f64()
            );
            true
        }
    }
}

/// Drive one prediction through the session reducer, rendering on success.
///
/// Returns false when the prediction failed; the alert is already printed.
async fn run_predict(client: &HubClient, session: &mut Session, text: &str) -> bool {
    session.apply(Event::PredictStarted);
    eprintln!("{}", session.status());

    let result = client.predict(text, &cancellable()).await;
    if let Some(Effect::Alert(message)) = session.apply(Event::PredictFinished(result)) {
        eprintln!("{}", message.red());
        return false;
    }

    if let Some(annotations) = session.output() {
        println!("{}", render::render_line(annotations));
        eprintln!(
            "{} tokens, {} entities",
            annotations.len(),
            annotations.entity_count()
        );
    }
    true
}

/// Per-call options wired to ctrl-c, so a hung endpoint can be abandoned
/// without killing the terminal session.
fn cancellable() -> CallOptions {
    let (cancel, signal) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel.send(true);
        }
    });
    CallOptions::new().cancel_signal(signal)
}

/// Print the label taxonomy with swatches.
fn print_labels() {
    for label in EntityLabel::KNOWN {
        println!("{}  {}", render::swatch(&label), label.description());
    }
    println!();
    println!("tokens tagged O are shown as plain text; unrecognised tags get a gray badge");
}

/// Resolve text input from an optional CLI argument and/or stdin.
///
/// Combination rules:
/// - arg only → arg
/// - stdin only → stdin
/// - both → `"{arg}\n\n{stdin}"`
/// - neither → error
fn resolve_text(arg: Option<String>, command: &str) -> Result<String, Box<dyn std::error::Error>> {
    let stdin_is_pipe = !io::stdin().is_terminal();
    let stdin_text = if stdin_is_pipe {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    } else {
        None
    };

    match (arg, stdin_text) {
        (Some(a), Some(s)) => Ok(format!("{a}\n\n{s}")),
        (Some(a), None) => Ok(a),
        (None, Some(s)) => Ok(s),
        (None, None) => {
            Err(format!("{command}: no input provided (pass text as argument or via stdin)").into())
        }
    }
}
