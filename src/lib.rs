//! Spotify Remote Playback CLI Library
//!
//! This library provides the pieces behind the `spotti` command: an OAuth 2.0
//! PKCE login against Spotify's accounts service, durable token storage in the
//! platform credential store, and a small client for the playback endpoints of
//! the Spotify Web API.
//!
//! # Modules
//!
//! - `api` - Route handlers for the local OAuth redirect server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - The crate-wide error type
//! - `management` - Credential persistence and the authorization session
//! - `server` - One-shot local HTTP listener for the OAuth redirect
//! - `spotify` - Spotify accounts and Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE helpers and formatting utilities
//!
//! # Example
//!
//! ```
//! use spotti::{config::Config, management::{KeyringStore, Session}, spotify::Playback};
//!
//! #[tokio::main]
//! async fn main() -> spotti::Res<()> {
//!     let session = Session::new(Config::from_env()?, KeyringStore::default())?;
//!     let mut player = Playback::new(session);
//!     player.session_mut().ensure_authorized(false).await?;
//!     player.next_track().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation in the library reports a [`error::SpottiError`],
/// so callers can match on the failure kind (denied consent, rate limiting,
/// provider errors, ...) and decide whether to continue.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
pub type Res<T> = std::result::Result<T, error::SpottiError>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Refreshing token...");
/// info!("Waiting for authorization on port {}", port);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// success!("Playing next track");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Library code never calls this;
/// it is reserved for the binary when startup cannot continue.
///
/// # Example
///
/// ```
/// error!("Authorization failed: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, such as a failed playback command inside the
/// interactive prompt, that the user should notice but that do not end the
/// program.
///
/// # Example
///
/// ```
/// warning!("Rate limit exceeded.");
/// warning!("Failed to open browser. Open this URL manually:\n{}", url);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
