mod cli;
mod config;
mod demo;
mod error;
mod server;
mod telemetry;

#[tokio::main]
async fn main() {
    if let Err(err) = cli::run().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
