use std::{fmt, str::FromStr};

use tabled::Table;

use crate::{
    Res, info,
    management::CredentialStore,
    spotify::Playback,
    success,
    types::{CommandTableRow, PlaybackInfo},
    utils, warning,
};

/// A command understood by the interactive prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptCommand {
    Next,
    Prev,
    Pause,
    Play,
    Info,
    Clear,
    Exit,
    Help,
}

impl PromptCommand {
    pub const ALL: [PromptCommand; 8] = [
        PromptCommand::Next,
        PromptCommand::Prev,
        PromptCommand::Pause,
        PromptCommand::Play,
        PromptCommand::Info,
        PromptCommand::Clear,
        PromptCommand::Exit,
        PromptCommand::Help,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PromptCommand::Next => "next",
            PromptCommand::Prev => "prev",
            PromptCommand::Pause => "pause",
            PromptCommand::Play => "play",
            PromptCommand::Info => "info",
            PromptCommand::Clear => "clear",
            PromptCommand::Exit => "exit",
            PromptCommand::Help => "help",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PromptCommand::Next => "Skip to the next track",
            PromptCommand::Prev => "Go back to the previous track",
            PromptCommand::Pause => "Pause the current track",
            PromptCommand::Play => "Resume the current track",
            PromptCommand::Info => "Display information about the current track",
            PromptCommand::Clear => "Clear the screen",
            PromptCommand::Exit => "Exit the program",
            PromptCommand::Help => "Show this list",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command: {}", self.0)
    }
}

impl FromStr for PromptCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        PromptCommand::ALL
            .into_iter()
            .find(|cmd| cmd.name() == input)
            .ok_or_else(|| UnknownCommand(input.to_string()))
    }
}

/// Sends one playback command and prints the outcome.
///
/// When the failure means the tokens are no longer usable, the user is sent
/// through the consent flow once and the command is tried again.
pub async fn execute<S: CredentialStore>(
    player: &mut Playback<S>,
    command: PromptCommand,
) -> Res<()> {
    match run(player, command).await {
        Err(e) if e.requires_reauthorization() => {
            warning!("{}. Authorizing again...", e);
            player.session_mut().ensure_authorized(true).await?;
            run(player, command).await
        }
        other => other,
    }
}

async fn run<S: CredentialStore>(player: &mut Playback<S>, command: PromptCommand) -> Res<()> {
    match command {
        PromptCommand::Next => {
            player.next_track().await?;
            success!("Playing next track");
        }
        PromptCommand::Prev => {
            player.previous_track().await?;
            success!("Playing previous track");
        }
        PromptCommand::Pause => {
            player.pause().await?;
            success!("Pausing playback");
        }
        PromptCommand::Play => {
            player.play().await?;
            success!("Starting playback");
        }
        PromptCommand::Info => print_playback(&player.get_playback_info().await?),
        PromptCommand::Clear => clear_screen(),
        PromptCommand::Help => print_help(),
        PromptCommand::Exit => {}
    }
    Ok(())
}

pub fn print_playback(playback: &PlaybackInfo) {
    let state = match playback {
        PlaybackInfo::NothingPlaying => {
            info!("No track is currently playing.");
            return;
        }
        PlaybackInfo::Playing(state) => state,
    };

    let Some(track) = state.track_name() else {
        info!("Playback is active but no track information is available.");
        return;
    };

    info!("Now playing: {} - {}", utils::format_artists(state), track);
    info!(
        "Progress: {}/{}{}",
        utils::format_millis(state.progress_ms()),
        utils::format_millis(state.track_duration_ms()),
        if state.is_playing { "" } else { " (paused)" }
    );
    if let Some(device) = &state.device {
        info!("Device: {}", device.name);
    }
}

pub fn print_help() {
    let rows: Vec<CommandTableRow> = PromptCommand::ALL
        .into_iter()
        .map(|cmd| CommandTableRow {
            command: cmd.name().to_string(),
            description: cmd.description().to_string(),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub fn clear_screen() {
    print!("\x1B[H\x1B[2J");
}
