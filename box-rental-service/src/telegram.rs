//! Telegram transport: long polling, one booking dialogue per Telegram user.
//!
//! Box choices are shown as a one-time reply keyboard, one box per row; any other reply
//! removes the keyboard.

use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove};
use tracing::{debug, info};

use crate::driver::DialogueDriver;

/// One button per choice, stacked vertically. `None` when there is nothing to choose from.
pub fn reply_keyboard(choices: &[String]) -> Option<KeyboardMarkup> {
    if choices.is_empty() {
        return None;
    }
    let rows = choices
        .iter()
        .map(|choice| vec![KeyboardButton::new(choice.clone())]);
    Some(
        KeyboardMarkup::new(rows)
            .resize_keyboard()
            .one_time_keyboard(),
    )
}

/// Poll Telegram until the process is interrupted.
pub async fn run(bot_token: String, driver: DialogueDriver) {
    let bot = Bot::new(bot_token);
    info!("starting Telegram long polling");

    let handler = Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let driver = driver.clone();
        async move { handle_message(bot, msg, driver).await }
    });

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_message(bot: Bot, msg: Message, driver: DialogueDriver) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        debug!(chat_id = msg.chat.id.0, "ignoring non-text message");
        return Ok(());
    };
    let Some(user) = msg.from.as_ref() else {
        debug!(chat_id = msg.chat.id.0, "ignoring message without sender");
        return Ok(());
    };

    let reply = driver.handle_message(&user.id.0.to_string(), text).await;

    let request = bot.send_message(msg.chat.id, reply.text);
    match reply_keyboard(&reply.choices) {
        Some(keyboard) => request.reply_markup(keyboard).await?,
        None => request.reply_markup(KeyboardRemove::new()).await?,
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_keyboard_without_choices() {
        assert!(reply_keyboard(&[]).is_none());
    }

    #[test]
    fn one_box_per_row_in_offer_order() {
        let keyboard =
            reply_keyboard(&["Бокс 3".to_string(), "Бокс 10 LUX".to_string()]).unwrap();

        assert_eq!(keyboard.keyboard.len(), 2);
        assert_eq!(keyboard.keyboard[0][0].text, "Бокс 3");
        assert_eq!(keyboard.keyboard[1][0].text, "Бокс 10 LUX");
    }
}
