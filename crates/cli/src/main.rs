mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use seedbed_core::{DatabaseConfig, DEFAULT_REPORT_PATH};

#[derive(Parser)]
#[command(name = "seedbed")]
#[command(about = "Provision the launch waitlist schema on a Supabase Postgres database")]
struct Cli {
    /// Roll back the schema instead of creating it
    #[arg(long)]
    rollback: bool,

    /// PostgreSQL connection string (overrides environment variables)
    #[arg(long)]
    connection_string: Option<String>,

    /// Where to write the execution report
    #[arg(long, default_value = DEFAULT_REPORT_PATH)]
    report: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = DatabaseConfig::from_env();
    let connection_string = match config.resolve(cli.connection_string.as_deref()) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            eprintln!("   export SUPABASE_URL='your-actual-project-url'");
            eprintln!("   export SUPABASE_SERVICE_KEY='your-actual-service-key'");
            eprintln!("   Or provide a connection string with --connection-string");
            return ExitCode::FAILURE;
        }
    };

    if cli.rollback {
        commands::rollback(&connection_string).await
    } else {
        commands::apply(&connection_string, &cli.report).await
    }
}
