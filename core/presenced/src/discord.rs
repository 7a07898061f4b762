//! Discord rich presence over the local IPC socket.

use discord_rich_presence::{activity, DiscordIpc, DiscordIpcClient};
use zathura_presence_core::{PresenceError, PresenceFrame, PresencePublisher, Result};

pub struct DiscordPublisher {
    application_id: String,
    client: Option<DiscordIpcClient>,
}

impl DiscordPublisher {
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            client: None,
        }
    }
}

impl PresencePublisher for DiscordPublisher {
    fn login(&mut self) -> Result<()> {
        let mut client = DiscordIpcClient::new(&self.application_id)
            .map_err(|err| PresenceError::Login(err.to_string()))?;
        client
            .connect()
            .map_err(|err| PresenceError::Login(err.to_string()))?;
        self.client = Some(client);
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        match self.client.take() {
            Some(mut client) => client
                .close()
                .map_err(|err| PresenceError::Logout(err.to_string())),
            None => Ok(()),
        }
    }

    fn set_state(&mut self, frame: &PresenceFrame) -> Result<()> {
        let client = self.client.as_mut().ok_or(PresenceError::NotConnected)?;
        client
            .set_activity(build_activity(frame))
            .map_err(|err| PresenceError::Publish(err.to_string()))
    }
}

/// Discord rejects empty strings, so an empty secondary line is left out.
fn build_activity(frame: &PresenceFrame) -> activity::Activity<'_> {
    let assets = activity::Assets::new()
        .large_image(&frame.icon)
        .large_text(&frame.large_text);
    let timestamps = activity::Timestamps::new().start(frame.started_at.timestamp());

    let activity = activity::Activity::new()
        .state(&frame.primary)
        .assets(assets)
        .timestamps(timestamps);
    if frame.secondary.is_empty() {
        activity
    } else {
        activity.details(&frame.secondary)
    }
}
