//! Webhook event handler

use chrono::Utc;
use common::{Error, GithubConfig, WebhookConfig};
use github::{GithubClient, Memo};
use line::{validate_postback, validate_text_message, LineClient, PostbackAction, WebhookEvent};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::presenter;
use crate::reminders;

/// Handles incoming webhook events for both bots
pub struct EventHandler {
    config: WebhookConfig,
    pool: SqlitePool,
    line: LineClient,
    github: GithubClient,
}

impl EventHandler {
    pub fn new(
        config: WebhookConfig,
        pool: SqlitePool,
        line: LineClient,
        github: GithubClient,
    ) -> Self {
        Self {
            config,
            pool,
            line,
            github,
        }
    }

    /// Process an event sent to the memo bot: commit the message to the
    /// configured repository and confirm with a reply.
    pub async fn handle_memo(&self, event: WebhookEvent) -> Result<(), Error> {
        match event {
            WebhookEvent::TextMessage(event) => {
                let command = validate_text_message(&event)?;
                self.check_authorized(&command.user_id, &command.reply_token)
                    .await?;

                // Read per request so token rotation needs no restart
                let github_config = GithubConfig::from_env()?;
                let memo = Memo::new(&command.text, &command.user_id, Utc::now())?;

                info!("Saving memo {} for user {}", memo.file_name(), memo.user_id);
                self.github
                    .create_file(&github_config, &memo.file_name(), &memo.content)
                    .await
                    .map_err(|e| Error::Downstream(e.to_string()))?;

                self.line
                    .reply_text(&command.reply_token, &memo.success_message())
                    .await
                    .map_err(|e| Error::Downstream(e.to_string()))?;

                Ok(())
            }
            WebhookEvent::Postback(_) => Err(Error::Unsupported("postback".to_string())),
            WebhookEvent::Unsupported { event_type } => Err(Error::Unsupported(event_type)),
        }
    }

    /// Process an event sent to the reminder bot. Text messages register a
    /// reminder group; postbacks drive the list, detail and delete actions.
    pub async fn handle_reminder(&self, event: WebhookEvent) -> Result<(), Error> {
        match event {
            WebhookEvent::TextMessage(event) => {
                let command = validate_text_message(&event)?;
                self.check_authorized(&command.user_id, &command.reply_token)
                    .await?;
                self.create_reminder(&command.user_id, &command.reply_token, &command.text)
                    .await
            }
            WebhookEvent::Postback(event) => {
                let command = validate_postback(&event)?;
                self.check_authorized(&command.user_id, &command.reply_token)
                    .await?;

                match command.action {
                    PostbackAction::List => {
                        self.show_reminder_list(&command.user_id, &command.reply_token)
                            .await
                    }
                    PostbackAction::Detail { group_id } => {
                        self.show_reminder_detail(
                            &group_id,
                            &command.user_id,
                            &command.reply_token,
                        )
                        .await
                    }
                    PostbackAction::Delete { group_id } => {
                        self.delete_reminder(&group_id, &command.user_id, &command.reply_token)
                            .await
                    }
                    PostbackAction::Other(other) => {
                        Err(Error::Unsupported(format!("postback type {:?}", other)))
                    }
                }
            }
            WebhookEvent::Unsupported { event_type } => Err(Error::Unsupported(event_type)),
        }
    }

    /// Reject users outside the allow list, telling them before failing
    async fn check_authorized(&self, user_id: &str, reply_token: &str) -> Result<(), Error> {
        if self.config.is_allowed_user(user_id) {
            return Ok(());
        }

        warn!("Rejected webhook from unauthorized user {}", user_id);

        // Reply failure must not mask the rejection
        if let Err(e) = self.line.reply_text(reply_token, "Unauthorized user.").await {
            warn!("Failed to notify unauthorized user: {}", e);
        }

        Err(Error::Unauthorized)
    }

    async fn create_reminder(
        &self,
        user_id: &str,
        reply_token: &str,
        message: &str,
    ) -> Result<(), Error> {
        let result =
            reminders::create_reminder_group(&self.pool, user_id, message, Utc::now()).await?;

        info!(
            "Registered reminder group {} for user {}",
            result.group_id, user_id
        );

        self.line
            .reply_text(reply_token, &presenter::created_reminder_message(&result))
            .await
            .map_err(|e| Error::Downstream(e.to_string()))
    }

    async fn show_reminder_list(&self, user_id: &str, reply_token: &str) -> Result<(), Error> {
        let items = reminders::list_reminder_groups(&self.pool, user_id).await?;

        if items.is_empty() {
            return self
                .line
                .reply_text(reply_token, "No reminders registered.")
                .await
                .map_err(|e| Error::Downstream(e.to_string()));
        }

        self.line
            .reply_flex(
                reply_token,
                "Reminder list",
                presenter::reminder_list_flex(&items),
            )
            .await
            .map_err(|e| Error::Downstream(e.to_string()))
    }

    async fn show_reminder_detail(
        &self,
        group_id: &str,
        user_id: &str,
        reply_token: &str,
    ) -> Result<(), Error> {
        match reminders::get_reminder_detail(&self.pool, group_id, user_id).await? {
            Some(detail) => self
                .line
                .reply_flex(
                    reply_token,
                    "Reminder detail",
                    presenter::reminder_detail_flex(&detail),
                )
                .await
                .map_err(|e| Error::Downstream(e.to_string())),
            None => self
                .line
                .reply_text(reply_token, "Reminder not found.")
                .await
                .map_err(|e| Error::Downstream(e.to_string())),
        }
    }

    async fn delete_reminder(
        &self,
        group_id: &str,
        user_id: &str,
        reply_token: &str,
    ) -> Result<(), Error> {
        let deleted = reminders::delete_reminder_group(&self.pool, group_id, user_id).await?;
        info!("Deleted {} reminders from group {}", deleted, group_id);

        self.line
            .reply_text(reply_token, "✅ Reminder deleted.")
            .await
            .map_err(|e| Error::Downstream(e.to_string()))
    }
}
