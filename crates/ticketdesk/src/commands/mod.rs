//! Command dispatch: bridges CLI args -> ticket service -> output formatting.

pub mod config_cmd;
pub mod tickets;
pub mod token;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Tickets(args) => tickets::handle(session, args, global).await,
        Command::Token(args) => token::handle(session, args, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
