//! Applies the built-in tool node to a conversation state stored as JSON.

#[macro_use]
extern crate tracing;

use std::fs;
use std::io::{self, Read as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tokio::runtime::Builder as RuntimeBuilder;
use tool_relay::default_tool_node;
use tool_relay::model::ConversationState;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Block the thread until the tool finishes.
    Blocking,
    /// Drive the node on a single-threaded runtime.
    Async,
}

#[derive(Parser, Debug)]
#[command(name = "tool-relay")]
#[command(about = "Run the pending tool call of a conversation state")]
struct Args {
    /// Execution mode of the tool node
    #[arg(long, value_enum, env = "TOOL_RELAY_MODE", default_value_t = Mode::Blocking)]
    mode: Mode,

    /// JSON file holding the state; read from stdin when omitted
    #[arg(value_name = "STATE_FILE")]
    state: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("tool-relay: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let input = match &args.state {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let state: ConversationState = serde_json::from_str(&input)?;
    debug!("loaded state with {} messages", state.messages.len());

    let node = default_tool_node();
    let output = match args.mode {
        Mode::Blocking => node.invoke(&state)?,
        Mode::Async => {
            let runtime = RuntimeBuilder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(node.ainvoke(&state))?
        }
    };

    Ok(serde_json::to_string_pretty(&output)?)
}
