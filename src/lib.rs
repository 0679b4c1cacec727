pub mod commands;
pub mod config;
pub mod data;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod report;

pub const BOT_NAME: &str = "punishment_bot";
pub const COMMAND_TARGET: &str = "punishment_bot::command";
pub const ERROR_TARGET: &str = "punishment_bot::error";
pub const FETCH_TARGET: &str = "punishment_bot::fetch";
pub const CONSOLE_TARGET: &str = "punishment_bot";

pub use data::{Data, DataInner};
pub use fetch::{FetchError, PunishmentClient};
pub use model::{PunishmentComparison, PunishmentDetail, TotalBarPercentage};
pub use report::format_comparison;
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
