use crate::{BOT_NAME, COMMAND_TARGET, CONSOLE_TARGET, Context, Data, ERROR_TARGET, Error};
use poise::FrameworkError;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log directory name
pub const LOG_DIR: &str = "logs";
/// Command log file name
pub const COMMAND_LOG_FILE: &str = "commands";
/// Filter used when `RUST_LOG` is not set; serenity is noisy below error
pub const DEFAULT_FILTER: &str = "info,serenity=error";

/// Initialize the logging system with console and file outputs
pub fn init() -> Result<(), Error> {
    if !Path::new(LOG_DIR).exists() {
        std::fs::create_dir_all(LOG_DIR)?;
    }

    let command_file = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, COMMAND_LOG_FILE);

    // Human readable console output
    let console_layer = fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_ansi(true);

    // JSON command log
    let command_layer = fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_ansi(false)
        .json()
        .with_writer(command_file);

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(DEFAULT_FILTER)?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(command_layer)
        .try_init()?;

    info!(bot = BOT_NAME, "Logging system initialized");
    Ok(())
}

/// Fields identifying where a command was invoked
struct CommandScope {
    command: String,
    guild_id: String,
    channel_id: String,
    user_id: String,
    user_name: String,
}

impl CommandScope {
    fn of(ctx: Context<'_>) -> Self {
        Self {
            command: ctx.command().qualified_name.clone(),
            guild_id: ctx
                .guild_id()
                .map_or_else(|| "DM".to_string(), |id| id.get().to_string()),
            channel_id: ctx.channel_id().get().to_string(),
            user_id: ctx.author().id.get().to_string(),
            user_name: ctx.author().name.clone(),
        }
    }
}

/// Invocation start time, stored per command invocation
struct CommandStarted(Instant);

/// Log the start of a command execution (pre-command hook)
pub async fn log_command_start(ctx: Context<'_>) {
    ctx.set_invocation_data(CommandStarted(Instant::now())).await;

    let scope = CommandScope::of(ctx);
    info!(
        target: COMMAND_TARGET,
        command = %scope.command,
        guild_id = %scope.guild_id,
        channel_id = %scope.channel_id,
        user_id = %scope.user_id,
        user_name = %scope.user_name,
        invocation = %ctx.invocation_string(),
        event = "start",
        "Command execution started"
    );
}

/// Log the end of a command execution (post-command hook)
pub async fn log_command_end(ctx: Context<'_>) {
    let elapsed = ctx
        .invocation_data::<CommandStarted>()
        .await
        .map(|started| started.0.elapsed());
    let duration_ms = elapsed.map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));

    let scope = CommandScope::of(ctx);
    info!(
        target: COMMAND_TARGET,
        command = %scope.command,
        guild_id = %scope.guild_id,
        channel_id = %scope.channel_id,
        user_id = %scope.user_id,
        duration_ms = duration_ms,
        event = "end",
        "Command execution completed"
    );
}

/// Log errors that escape a command
pub fn log_command_error(error: &FrameworkError<'_, Data, Error>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            let scope = CommandScope::of(*ctx);
            error!(
                target: ERROR_TARGET,
                command = %scope.command,
                guild_id = %scope.guild_id,
                user_id = %scope.user_id,
                error = %error,
                "Command error"
            );
        }
        FrameworkError::ArgumentParse { error, input, ctx, .. } => {
            let scope = CommandScope::of(*ctx);
            error!(
                target: ERROR_TARGET,
                command = %scope.command,
                user_id = %scope.user_id,
                input = ?input,
                error = %error,
                "Command arguments could not be parsed"
            );
        }
        FrameworkError::Setup { error, .. } => {
            error!(target: ERROR_TARGET, error = %error, "Framework setup failed");
        }
        err => {
            error!(
                target: ERROR_TARGET,
                error = ?err,
                "Other framework error"
            );
        }
    }
}

pub fn log_console(message: String) {
    info!(
        target: CONSOLE_TARGET,
        message = %message,
        event = "console",
    );
}
