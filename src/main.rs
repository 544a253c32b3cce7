use chloe_companion::avatar::TerminalAvatar;
use chloe_companion::commands::{parse_line, render_reply, ReplCommand};
use chloe_companion::companion::{Companion, TurnResult};
use chloe_companion::config::Config;
use chloe_companion::mood::Mood;
use chloe_companion::personas::ChatContext;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Chloe - terminal companion with a mood/expression engine
#[derive(Parser, Debug)]
#[command(name = "chloe", version, about)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Persona context (agent, shell, dex, coder)
    #[arg(short = 'x', long)]
    context: Option<ChatContext>,

    /// Mood the session starts in and returns to on /clear
    #[arg(short = 'm', long, value_parser = parse_mood)]
    default_mood: Option<Mood>,

    /// Use the local responder even if an API key is set
    #[arg(long)]
    mock: bool,
}

fn parse_mood(raw: &str) -> Result<Mood, String> {
    Mood::parse(raw).ok_or_else(|| {
        let names: Vec<&str> = Mood::ALL.iter().map(|m| m.as_str()).collect();
        format!("unknown mood '{raw}' (use one of: {})", names.join(", "))
    })
}

fn prompt(loading: bool) {
    if loading {
        print!("(chloe is typing...) > ");
    } else {
        print!("> ");
    }
    let _ = std::io::stdout().flush();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.llm.apply_env_overrides();
    if let Some(context) = args.context {
        config.companion.context = context;
    }
    if let Some(mood) = args.default_mood {
        config.companion.default_mood = mood;
    }

    let mut companion = Companion::from_config(config, Box::new(TerminalAvatar::new()), args.mock)?;

    info!(
        backend = companion.backend_name(),
        context = %companion.context(),
        mood = %companion.mood(),
        "♡ Chloe starting"
    );

    if let Some(greeting) = companion.messages().first() {
        println!("chloe: {}\n", greeting.content);
    }
    prompt(false);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut turns: JoinSet<TurnResult> = JoinSet::new();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "failed to read stdin");
                        break;
                    }
                };

                match parse_line(&line) {
                    Ok(None) => {}
                    Ok(Some(ReplCommand::Quit)) => break,
                    Ok(Some(ReplCommand::Chat(text))) => {
                        if let Err(e) = companion.spawn_turn(&text, &mut turns) {
                            println!("  ! {e}");
                        }
                    }
                    Ok(Some(cmd)) => match companion.handle_command(cmd).await {
                        Ok(out) if out.is_empty() => {}
                        Ok(out) => println!("{out}"),
                        Err(e) => println!("  ! {e}"),
                    },
                    Err(e) => println!("  ! {e}"),
                }
                prompt(companion.is_loading());
            }
            Some(joined) = turns.join_next() => {
                match joined {
                    Ok((pending, result)) => {
                        let outcome = companion.complete_turn(pending, result);
                        if let Some(reply) = companion.messages().last() {
                            println!("\n{}", render_reply(reply, &outcome));
                        }
                    }
                    Err(e) => warn!(error = %e, "chat task failed"),
                }
                prompt(companion.is_loading());
            }
            _ = &mut ctrl_c => {
                println!();
                break;
            }
        }
    }

    info!(turns = companion.metrics().turns_total, "session ended");
    Ok(())
}
