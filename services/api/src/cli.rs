use crate::demo::{run_estimate, run_wizard_demo, EstimateArgs, WizardDemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use movequote::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "movequote",
    about = "Run the moving-quote lead service or try the estimate and wizard from the command line",
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
    /// Print the non-binding estimate for a set of wizard answers
    Estimate(EstimateArgs),
    /// Walk the quote wizard end to end with sample answers
    WizardDemo(WizardDemoArgs),
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
        Command::Estimate(args) => run_estimate(args),
        Command::WizardDemo(args) => run_wizard_demo(args).await,
    }
}
