//! CLI entrypoint for serving the scorecard MCP server and running one-off lookups.

mod config;
mod mcp;
mod service;
#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

use clap::{Parser, Subcommand};
use mcp::ScorecardServer;
use rmcp::ServiceExt;
use service::ScorecardService;

#[derive(Parser)]
#[command(
    name = "scorecard-mcp",
    version,
    about = "MCP server for OpenSSF Scorecard security posture lookups"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server
    Serve {
        /// Run as MCP server over stdio
        #[arg(long)]
        mcp: bool,
    },
    /// Fetch the scorecard for one package and print the raw JSON
    Lookup {
        /// Package in the form platform/owner/repository, e.g. "github.com/ossf/scorecard"
        package: String,
    },
}

fn init_logging() {
    // Logs always go to stderr; stdout carries the MCP transport or lookup payload.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { mcp } => {
            if !mcp {
                anyhow::bail!("Only --mcp mode is currently supported");
            }

            init_logging();
            tracing::info!("scorecard-mcp server starting");

            let server = ScorecardServer::new()?;
            let service = server.serve(rmcp::transport::stdio()).await?;
            service.waiting().await?;
        }
        Commands::Lookup { package } => {
            init_logging();

            let service = ScorecardService::new()?;
            let payload = service.lookup(&package).await?;
            println!("{payload}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_parses_mcp_flag() {
        let cli = Cli::try_parse_from(["scorecard-mcp", "serve", "--mcp"]).expect("parse");
        assert!(matches!(cli.command, Commands::Serve { mcp: true }));
    }

    #[test]
    fn lookup_takes_package_argument() {
        let cli = Cli::try_parse_from(["scorecard-mcp", "lookup", "gitlab.com/owner/repo"])
            .expect("parse");
        match cli.command {
            Commands::Lookup { package } => assert_eq!(package, "gitlab.com/owner/repo"),
            Commands::Serve { .. } => panic!("expected lookup command"),
        }
    }

    #[test]
    fn lookup_requires_package() {
        assert!(Cli::try_parse_from(["scorecard-mcp", "lookup"]).is_err());
    }
}
