pub mod commands;
pub mod dispatcher;
pub mod format;
pub mod handlers;

pub use commands::{parse_command, Command, ParseError, Usage};
pub use dispatcher::run_bot;
pub use handlers::{handle_command, respond, BotContext, Sender};
