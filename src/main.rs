use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotti::{
    cli::{self, PromptCommand},
    config::{self, Config},
    error,
    management::{KeyringStore, Session},
    spotify::Playback,
    warning,
};

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
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Run the browser consent flow even if tokens are stored
    #[clap(long, global = true)]
    reauth: bool,

    /// Without a subcommand an interactive prompt is started
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with the Spotify API
    Auth,

    /// Remove stored Spotify credentials
    Logout,

    /// Show the current track
    Info,

    /// Resume playback
    Play,

    /// Pause playback
    Pause,

    /// Skip to the next track
    Next,

    /// Go back to the previous track
    Prev,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Some(Command::Completions(opt)) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    };
    let session = match Session::new(config, KeyringStore::default()) {
        Ok(session) => session,
        Err(e) => error!("Cannot create session. Err: {}", e),
    };
    let mut player = Playback::new(session);

    let command = match cli.command {
        None => None,
        Some(Command::Auth) => {
            if let Err(e) = cli::auth(player.session_mut(), true).await {
                error!("Authentication failed: {}", e);
            }
            return;
        }
        Some(Command::Logout) => {
            if let Err(e) = cli::logout(player.session_mut()) {
                error!("Cannot remove credentials: {}", e);
            }
            return;
        }
        Some(Command::Info) => Some(PromptCommand::Info),
        Some(Command::Play) => Some(PromptCommand::Play),
        Some(Command::Pause) => Some(PromptCommand::Pause),
        Some(Command::Next) => Some(PromptCommand::Next),
        Some(Command::Prev) => Some(PromptCommand::Prev),
        Some(Command::Completions(_)) => return,
    };

    if let Err(e) = player.session_mut().ensure_authorized(cli.reauth).await {
        error!("Authorization failed: {}", e);
    }

    match command {
        Some(command) => {
            if let Err(e) = cli::execute(&mut player, command).await {
                cli::report(&e);
                std::process::exit(1);
            }
        }
        None => {
            if let Err(e) = cli::execute(&mut player, PromptCommand::Info).await {
                cli::report(&e);
            }
            if let Err(e) = cli::prompt(&mut player).await {
                error!("Prompt failed: {}", e);
            }
        }
    }
}
