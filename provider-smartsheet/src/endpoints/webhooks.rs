//! Webhook subscriptions.

use core_models::{IndexResultResponse, ResultResponse, Webhook};
use tracing::instrument;

use crate::client::{into_result, require_id, require_text, Query, SmartsheetClient};
use crate::error::{Result, SmartsheetError};
use crate::types::Acknowledgement;

impl SmartsheetClient {
    #[instrument(skip_all, fields(include_all = %include_all))]
    pub async fn list_webhooks(
        &self,
        include_all: bool,
        auth: Option<&str>,
    ) -> Result<Vec<Webhook>> {
        let path = Query::new()
            .param("includeAll", include_all)
            .finish("webhooks");
        let page: IndexResultResponse<Webhook> = self.get(&path, auth).await?;
        Ok(page.data)
    }

    #[instrument(skip_all, fields(webhook_id = %webhook_id))]
    pub async fn get_webhook(&self, webhook_id: i64, auth: Option<&str>) -> Result<Webhook> {
        require_id("webhook id", webhook_id)?;
        self.get(&format!("webhooks/{}", webhook_id), auth).await
    }

    /// Register a webhook. It starts disabled; enable it with
    /// [`update_webhook`](Self::update_webhook) once the callback answers
    /// the verification challenge.
    #[instrument(skip_all)]
    pub async fn create_webhook(&self, webhook: &Webhook, auth: Option<&str>) -> Result<Webhook> {
        require_text("Webhook name", webhook.name.as_deref().unwrap_or_default())?;
        require_text(
            "Webhook callback url",
            webhook.callback_url.as_deref().unwrap_or_default(),
        )?;
        match webhook.scope_object_id {
            Some(id) => require_id("webhook scope object id", id)?,
            None => {
                return Err(SmartsheetError::Validation(
                    "Webhook scope object id is required".to_string(),
                ))
            }
        };

        let response: ResultResponse<Webhook> = self.post("webhooks", webhook, auth).await?;
        into_result(response, "create_webhook")
    }

    /// Change a webhook. Only the name, callback url, events, version and
    /// enabled flag are sent; the scope is fixed at creation.
    #[instrument(skip_all, fields(webhook_id = %webhook_id))]
    pub async fn update_webhook(
        &self,
        webhook_id: i64,
        webhook: &Webhook,
        auth: Option<&str>,
    ) -> Result<Webhook> {
        require_id("webhook id", webhook_id)?;

        let body = Webhook {
            name: webhook.name.clone(),
            callback_url: webhook.callback_url.clone(),
            events: webhook.events.clone(),
            version: webhook.version,
            enabled: webhook.enabled,
            ..Default::default()
        };

        let response: ResultResponse<Webhook> = self
            .put(&format!("webhooks/{}", webhook_id), &body, auth)
            .await?;
        into_result(response, "update_webhook")
    }

    #[instrument(skip_all, fields(webhook_id = %webhook_id))]
    pub async fn delete_webhook(
        &self,
        webhook_id: i64,
        auth: Option<&str>,
    ) -> Result<Acknowledgement> {
        require_id("webhook id", webhook_id)?;
        self.delete(&format!("webhooks/{}", webhook_id), auth).await
    }
}
