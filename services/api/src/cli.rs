use crate::demo::{run_demo, DemoArgs};
use crate::error::AppError;
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vibescore_income::{compute_income_score, decode_payload, rollup};

#[derive(Parser, Debug)]
#[command(
    name = "VibeScore Income API",
    about = "Serve and exercise the VibeScore income scoring engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score one base64url-encoded `{data, options}` payload and print JSON
    Score(ScoreArgs),
    /// Run worked sample profiles through the engine
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Base64url-encoded JSON payload `{data, options}`
    payload: String,
    /// Optional monthly rollup CSV spliced in as the income history
    #[arg(long)]
    rollup_csv: Option<PathBuf>,
    /// Pretty-print the resulting JSON
    #[arg(long)]
    pretty: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let payload = decode_payload(&args.payload)?;

    let data = match args.rollup_csv {
        Some(path) => {
            let history = rollup::history_from_path(path)?;
            rollup::splice_history(&payload.data, &history)
        }
        None => payload.data,
    };

    let result = compute_income_score(&data, &payload.options);
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    };
    println!("{}", rendered.map_err(vibescore_income::PayloadError::from)?);
    Ok(())
}
