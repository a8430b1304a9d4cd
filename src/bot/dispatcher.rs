use std::time::Duration;

use super::handlers::{respond, BotContext, Sender};
use crate::telegram::{Message, TelegramClient};

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Answer a single incoming message.
async fn dispatch(ctx: &BotContext, telegram: &TelegramClient, update_id: i64, message: &Message) {
    let Some(text) = message.text.as_deref() else {
        return;
    };
    let sender = Sender {
        user_id: message.from.as_ref().map(|u| u.id.to_string()),
        update_id,
    };

    if let Some(reply) = respond(ctx, &sender, text).await {
        // Send failures are already logged by the client.
        let _ = telegram.send_message(message.chat.id, &reply).await;
    }
}

/// Long-poll Telegram forever, handling updates one at a time.
pub async fn run_bot(ctx: BotContext, telegram: TelegramClient, poll_timeout_secs: u64) {
    let mut offset: i64 = 0;
    tracing::info!("What-If Profit/Loss Bot is running");

    loop {
        let updates = match telegram.get_updates(offset, poll_timeout_secs).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::error!(error = %e, "getUpdates failed, retrying");
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(message) = update.message.as_ref() else {
                continue;
            };
            tracing::debug!(
                update_id = update.update_id,
                chat_id = message.chat.id,
                "Update received"
            );
            dispatch(&ctx, &telegram, update.update_id, message).await;
        }
    }
}
