use clap::{Parser, Subcommand};
use graphlet::error::Result;

mod cli;

#[derive(Parser)]
#[command(name = "graphlet")]
#[command(version = "0.1.0")]
#[command(about = "Serve an in-memory tutorial dataset through a single GraphQL endpoint", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an example configuration file
    Init {
        /// Output config file path (if not specified, outputs to stdout)
        #[arg(long)]
        output: Option<String>,
    },

    /// Start the GraphQL server
    Serve {
        /// Config file path
        #[arg(long, default_value = "graphlet.toml")]
        config: String,

        /// Server port (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one request against the seeded dataset and print the JSON result
    Query {
        /// Request string, e.g. '{ tutorialList { id title } }'
        query: String,

        /// Variables as a JSON object
        #[arg(long)]
        variables: Option<String>,

        /// Operation to run when the request holds several
        #[arg(long)]
        operation_name: Option<String>,

        /// Config file path
        #[arg(long, default_value = "graphlet.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { output } => {
            cli::init::run(output)?;
        }
        Commands::Serve { config, port } => {
            cli::serve::run(config, port).await?;
        }
        Commands::Query {
            query,
            variables,
            operation_name,
            config,
        } => {
            cli::query::run(query, variables, operation_name, config)?;
        }
    }

    Ok(())
}
