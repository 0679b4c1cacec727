use poise::serenity_prelude::{self as serenity};
use punishment_bot::config::{self, BotConfig};
use punishment_bot::{Data, Error, commands, logging};
use serenity::GatewayIntents;
use tracing::{error, info, warn};

/// Main function to run the bot
async fn async_main() -> Result<(), Error> {
    // A missing .env is fine, everything can come from the real environment
    let dotenv_result = dotenv::dotenv();

    logging::init()?;

    if let Err(err) = dotenv_result {
        if !err.not_found() {
            warn!("Failed to load .env: {err}");
        }
    }

    let token = config::discord_token()?;
    let config = BotConfig::load().await?;
    let prefix = config.prefix.clone();

    let data = Data::new(config)?;
    let api = data.client.config();
    info!(
        endpoint = %api.endpoint,
        timeout_secs = api.timeout_secs,
        prefix = %prefix,
        "Configuration loaded"
    );

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            pre_command: |ctx| Box::pin(logging::log_command_start(ctx)),
            post_command: |ctx| Box::pin(logging::log_command_end(ctx)),
            on_error: |error| {
                Box::pin(async move {
                    logging::log_command_error(&error);
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                logging::log_console(format!(
                    "Connected as {}, registering {} commands",
                    ready.user.name,
                    framework.options().commands.len()
                ));
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    // Prefix commands need the message content intent
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot...");
    client.start().await?;

    Ok(())
}

fn main() {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to start the async runtime: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = runtime.block_on(async_main()) {
        error!("Bot stopped: {err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
