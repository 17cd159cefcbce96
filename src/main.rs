use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mixtape::{config, error, info, server, success, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the web server
    Serve(ServeOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind to, overrides SERVER_ADDRESS
    #[clap(long)]
    address: Option<String>,

    /// Open the authorization page in the default browser once listening
    #[clap(long)]
    open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mixtape=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(opt) => serve(opt).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

async fn serve(opt: ServeOptions) {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let mut config = config::Config::from_env();
    if let Some(address) = opt.address {
        config.server_address = address;
    }

    for name in config.spotify.missing_credentials() {
        warning!("{} is not set, Spotify will reject authorization requests", name);
    }

    let listener = match server::bind(&config.server_address).await {
        Ok(listener) => listener,
        Err(e) => error!("{}", e),
    };
    let root_url = match listener.local_addr() {
        Ok(addr) => format!("http://{}/", addr),
        Err(e) => error!("Failed to read listener address: {}", e),
    };

    success!("Listening on {}", root_url);

    if opt.open {
        if webbrowser::open(&root_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                root_url
            )
        }
    } else {
        info!("Open {} to authorize with Spotify", root_url);
    }

    let state = server::AppState::in_memory(config);
    if let Err(e) = server::start_api_server(listener, state).await {
        error!("Server stopped: {}", e);
    }
}
