//! # CLI Module
//!
//! User-facing side of `spotti`. The functions here sit on top of the
//! [`crate::spotify::Playback`] client and the [`crate::management::Session`]
//! it owns, and turn their results into console output.
//!
//! ## Commands
//!
//! - [`auth`] / [`logout`] - run the consent flow, or forget stored tokens
//! - [`execute`] - one playback command (`next`, `prev`, `pause`, `play`,
//!   `info`, ...) with a single re-authorization when tokens are rejected
//! - [`prompt`] - the interactive loop used when no subcommand is given
//!
//! ## Error Handling
//!
//! Nothing in this module exits the process. Failures come back as
//! [`crate::error::SpottiError`]; the prompt reports them with [`report`] and
//! keeps going, while `main` decides which failures end a one-shot command.
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotti                 # authorize if needed, show the track, start the prompt
//! spotti --reauth        # same, but always run the consent flow first
//! spotti next            # one-shot command
//! spotti logout          # remove tokens from the credential store
//! ```

mod auth;
mod playback;
mod prompt;

pub use auth::auth;
pub use auth::logout;
pub use playback::PromptCommand;
pub use playback::UnknownCommand;
pub use playback::clear_screen;
pub use playback::execute;
pub use playback::print_help;
pub use playback::print_playback;
pub use prompt::prompt;
pub use prompt::report;
