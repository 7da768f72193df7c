//! Chat commands answered while the bot runs in `serve` mode.
//!
//! Replies are plain text built by pure functions; the dispatcher only wires
//! them to Telegram.

use std::time::{Duration, Instant};

use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::ReplyParameters;
use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Hot Bot commands:")]
pub enum Command {
    #[command(description = "initialize the bot")]
    Start,
    #[command(description = "show this help message")]
    Help,
    #[command(description = "display bot information")]
    Info,
    #[command(description = "test bot responsiveness")]
    Ping,
    #[command(description = "show bot uptime")]
    Uptime,
}

/// Process start, injected into handlers.
#[derive(Clone, Copy, Debug)]
pub struct StartedAt(pub Instant);

pub fn welcome_text() -> String {
    "🔥 Welcome to Hot Bot!\n\n\
     I collect Google Trends, Reddit and world news headlines and post a daily digest to the channel.\n\n\
     🎯 Basic Commands:\n\
     /help - Show this help message\n\
     /info - Get bot information\n\
     /ping - Check if I'm responsive\n\n\
     Type /help for more detailed information about each command.\n\n\
     Let's get started! 🚀"
        .to_string()
}

pub fn help_text() -> String {
    "📖 Hot Bot Help\n\n\
     Basic Commands:\n\
     • /start - Initialize the bot\n\
     • /help - Show this help message\n\
     • /info - Display bot information\n\
     • /ping - Test bot responsiveness\n\
     • /uptime - Show bot uptime\n\n\
     Daily Feature:\n\
     🌅 Once a day the channel gets a digest of trends and world news.\n\n\
     Tips:\n\
     • Commands are case-sensitive"
        .to_string()
}

/// `Nd Nh Nm`
pub fn format_uptime_short(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!(
        "{}d {}h {}m",
        secs / 86_400,
        (secs % 86_400) / 3_600,
        (secs % 3_600) / 60
    )
}

/// `Nd Nh Nm Ns`
pub fn format_uptime_long(uptime: Duration) -> String {
    format!("{} {}s", format_uptime_short(uptime), uptime.as_secs() % 60)
}

pub fn info_text(uptime: Duration) -> String {
    format!(
        "ℹ️ Bot Information\n\n\
         Name: Hot Bot\n\
         Version: {}\n\
         Uptime: {}\n\n\
         Features:\n\
         ✅ Daily trends & news digest\n\
         ✅ Structured logging\n\n\
         Built with ❤️ using teloxide",
        env!("CARGO_PKG_VERSION"),
        format_uptime_short(uptime)
    )
}

pub fn uptime_text(uptime: Duration) -> String {
    format!("⏱️ Bot uptime: {}", format_uptime_long(uptime))
}

pub fn unknown_command_text(command: &str) -> String {
    format!("❓ Unknown command: {command}\n\nUse /help to see available commands.")
}

/// The command word of a `/`-prefixed message, if any.
pub fn command_word(text: &str) -> Option<&str> {
    let word = text.split_whitespace().next()?;
    word.starts_with('/').then_some(word)
}

async fn answer(bot: Bot, msg: Message, cmd: Command, started: StartedAt) -> ResponseResult<()> {
    tracing::info!(command = ?cmd, chat = %msg.chat.id, "command received");
    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, welcome_text()).await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, help_text()).await?;
        }
        Command::Info => {
            bot.send_message(msg.chat.id, info_text(started.0.elapsed()))
                .await?;
        }
        Command::Ping => {
            let t0 = Instant::now();
            bot.send_message(msg.chat.id, "🏓 Pong!").await?;
            let latency = t0.elapsed().as_millis();
            bot.send_message(msg.chat.id, format!("⚡ Response time: {latency}ms"))
                .await?;
        }
        Command::Uptime => {
            bot.send_message(msg.chat.id, uptime_text(started.0.elapsed()))
                .await?;
        }
    }
    Ok(())
}

async fn unknown(bot: Bot, msg: Message) -> ResponseResult<()> {
    let Some(word) = msg.text().and_then(command_word) else {
        return Ok(());
    };
    tracing::warn!(command = word, chat = %msg.chat.id, "unknown command used");
    bot.send_message(msg.chat.id, unknown_command_text(word))
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// Long-poll for commands until Ctrl-C.
pub async fn serve(bot: Bot) {
    let started = StartedAt(Instant::now());
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!(error = %e, "could not register command list");
    }

    let handler = Update::filter_message()
        .branch(dptree::entry().filter_command::<Command>().endpoint(answer))
        .branch(dptree::endpoint(unknown));

    tracing::info!("serving chat commands");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![started])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "command handler failed",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    tracing::info!("command dispatcher stopped");
}
