mod cmd;
mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "relay",
    about = "Persona-aware gateway for invoking cataloged remote actions",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the persona for a set of groups
    Resolve {
        /// Group names the caller belongs to
        #[arg(long, num_args = 1.., required = true)]
        groups: Vec<String>,
    },

    /// Show the action catalog
    Catalog {
        /// Include disabled entries
        #[arg(long)]
        all: bool,
    },

    /// Invoke an action through the gateway
    Invoke {
        /// Action id (e.g. summarize-docs)
        #[arg(long)]
        action: String,

        /// Caller id (defaults to the configured anonymous identity)
        #[arg(long)]
        user: Option<String>,

        /// Caller group (repeatable)
        #[arg(long = "group")]
        groups: Vec<String>,

        /// Selected resource URI (repeatable)
        #[arg(long = "uri")]
        uris: Vec<String>,

        /// Extra params as a JSON object, overlaid on the built ones
        #[arg(long)]
        params: Option<String>,
    },

    /// Run the HTTP gateway
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3141", env = "RELAY_PORT")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config = relay_core::config::GatewayConfig::from_env();

    let result = match cli.command {
        Commands::Resolve { groups } => cmd::resolve::run(config, groups, cli.json).await,
        Commands::Catalog { all } => cmd::catalog::run(config, all, cli.json).await,
        Commands::Invoke {
            action,
            user,
            groups,
            uris,
            params,
        } => {
            cmd::invoke::run(
                config,
                cmd::invoke::InvokeArgs {
                    action,
                    user,
                    groups,
                    uris,
                    params,
                },
                cli.json,
            )
            .await
        }
        Commands::Serve { port } => cmd::serve::run(config, port).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
