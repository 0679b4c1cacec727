use crate::fetch::PunishmentClient;
use crate::report::format_comparison;
use crate::{COMMAND_TARGET, Context, Data, Error};
use poise::command;
use poise::serenity_prelude::CreateMessage;
use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// Sent while the comparison is being fetched
pub const LOADING_MESSAGE: &str = "⏳ Đang tải dữ liệu phạt...";

/// All commands the bot registers
#[must_use]
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![ping(), compare_fine()]
}

/// Check if the bot is responsive
///
/// Replies to the invoking message, posts in the channel and sends a DM.
#[command(prefix_command, slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    ctx.reply("reply pong").await?;
    ctx.channel_id()
        .say(ctx.serenity_context(), "channel send pong")
        .await?;
    ctx.author()
        .direct_message(ctx.serenity_context(), CreateMessage::new().content("hello DM"))
        .await?;
    Ok(())
}

/// Compare your punishment rates this month with the company
#[command(prefix_command, slash_command, rename = "comparefine")]
pub async fn compare_fine(ctx: Context<'_>) -> Result<(), Error> {
    send_loading_notice(ctx.reply(LOADING_MESSAGE)).await;

    let username = ctx.author().name.clone();
    let reply = comparison_reply(&ctx.data().client, &username).await;
    ctx.reply(reply).await?;
    Ok(())
}

/// Send the loading notice, logging a failure instead of aborting the command
///
/// Returns whether the notice went out.
pub async fn send_loading_notice<T, E: Display>(send: impl Future<Output = Result<T, E>>) -> bool {
    match send.await {
        Ok(_) => true,
        Err(e) => {
            warn!(target: COMMAND_TARGET, error = %e, "Failed to send loading notice");
            false
        }
    }
}

/// Build the chat reply for `username`
///
/// Failures are turned into a single line for the user rather than returned.
pub async fn comparison_reply(client: &PunishmentClient, username: &str) -> String {
    match client.fetch_comparison(username).await {
        Ok(comparison) => format!(
            "Người dùng: {username}\n\n{}",
            format_comparison(&comparison)
        ),
        Err(e) => format!("❌ Có lỗi xảy ra khi lấy dữ liệu phạt: {e}. Vui lòng thử lại sau."),
    }
}
