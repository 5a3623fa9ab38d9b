use crate::config::CONFIG;
use crate::error::{BotError, BotResult};

/// POST a message to the configured incoming webhook.
pub fn post_message(text: &str) -> BotResult<()> {
    let client = reqwest::blocking::Client::new();
    let res = client
        .post(&CONFIG.mattermost_webhook_url)
        .json(&json!({ "text": text }))
        .send()?;

    if !res.status().is_success() {
        throw!(BotError::Misc(Some(format!(
            "mattermost returned {}",
            res.status()
        ))))
    }

    debug!("message delivered to mattermost");
    Ok(())
}
