use std::process;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod resolve;
pub mod session;
pub mod substitute;

use cli::{Args, Echo, Invocation, StackSelection};

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),

    #[error(transparent)]
    Resolution(#[from] resolve::Error),

    #[error(transparent)]
    Dispatch(#[from] dispatch::Error),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let invocation = match Invocation::from_args(args) {
        Ok(invocation) => invocation,
        Err(error) => {
            eprintln!("{}", error);
            process::exit(1);
        }
    };

    init_logging(invocation.echo);

    match run(invocation).await {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("{}", error);
            process::exit(1);
        }
    }
}

fn init_logging(echo: Echo) {
    let level = match echo {
        Echo::Quiet => LevelFilter::WARN,
        Echo::Verbose | Echo::DryRun => LevelFilter::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .without_time()
        .init();
}

async fn run(invocation: Invocation) -> Result<i32, Error> {
    // A config file's region wins for the lookup session; the dispatched
    // command still receives the --region value from the command line.
    let (stack, session_region) = match &invocation.stack {
        StackSelection::Named(reference) => {
            let (stack, config_region) = config::effective_stack(reference)?;
            (Some(stack), config_region.or_else(|| invocation.region.clone()))
        }
        StackSelection::ExportsOnly => (None, invocation.region.clone()),
    };

    let client = session::client(session_region.as_deref(), invocation.profile.as_deref()).await;
    let ids = resolve::identifiers(&client, stack.as_deref()).await?;

    if invocation.echo != Echo::Quiet {
        println!("Replacements:");
        for (name, value) in &ids {
            println!("  {}: {}", name, value);
        }
        println!();
    }

    let command = dispatch::build_command(&invocation, &ids)?;

    if invocation.echo != Echo::Quiet {
        println!("Command:");
        println!("  {}", command.join(" "));
        println!();
    }

    if invocation.echo == Echo::DryRun {
        return Ok(0);
    }

    return Ok(dispatch::run(&command)?);
}
