use crate::demo::{run_bids, run_demo, run_participants, BidsArgs, DemoArgs, ParticipantsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tender_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tender Desk",
    about = "Track tender bids and competitive rankings from the command line",
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
    /// List the vendor's own bids with their lifecycle flags
    Bids(BidsArgs),
    /// Rank one tender's participant board
    Participants(ParticipantsArgs),
    /// Walk through the tracker against the built-in sample listing
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

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Bids(args) => run_bids(args).await,
        Command::Participants(args) => run_participants(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
