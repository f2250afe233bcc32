use std::{future::Future, io::Write};

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::{
    Res,
    cli::playback::{self, PromptCommand},
    error::SpottiError,
    management::CredentialStore,
    spotify::Playback,
    warning,
};

/// Interactive loop: read a command, run it, report, repeat until `exit`,
/// EOF or Ctrl-C.
///
/// A failed command never ends the loop; it is reported and the prompt
/// comes back.
pub async fn prompt<S: CredentialStore>(player: &mut Playback<S>) -> Res<()> {
    let interrupted = async {
        // Without a SIGINT handler the prompt just keeps reading.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    read_commands(player, BufReader::new(tokio::io::stdin()), interrupted).await
}

async fn read_commands<S, R>(
    player: &mut Playback<S>,
    input: R,
    interrupted: impl Future<Output = ()>,
) -> Res<()>
where
    S: CredentialStore,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    tokio::pin!(interrupted);

    loop {
        print!("{} ", "Spotti>".green().bold());
        std::io::stdout().flush()?;

        let next = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut interrupted => {
                println!();
                return Ok(());
            }
        };
        let Some(line) = next else {
            println!();
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<PromptCommand>() {
            Ok(PromptCommand::Exit) => return Ok(()),
            Ok(command) => {
                if let Err(e) = playback::execute(player, command).await {
                    report(&e);
                }
            }
            Err(_) => warning!("Invalid command. Type 'help' for a list of commands."),
        }
    }
}

/// Prints a failed command the way the prompt shows it.
pub fn report(err: &SpottiError) {
    match err {
        SpottiError::RateLimited {
            retry_after: Some(secs),
        } => warning!("Rate limit exceeded. Try again in {} seconds.", secs),
        SpottiError::RateLimited { retry_after: None } => warning!("Rate limit exceeded."),
        other => warning!("Error: {}", other),
    }
}
