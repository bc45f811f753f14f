//! Users and the home listing.

use core_models::{Home, IndexResultResponse, ResultResponse, User};
use tracing::instrument;

use crate::client::{into_result, require_id, Query, SmartsheetClient};
use crate::error::{Result, SmartsheetError};
use crate::types::{Acknowledgement, UserRemoval};

impl SmartsheetClient {
    /// The user the access token belongs to.
    #[instrument(skip_all)]
    pub async fn current_user(&self, auth: Option<&str>) -> Result<User> {
        self.get("users/me", auth).await
    }

    /// Everything the current user can see, nested by container.
    #[instrument(skip_all)]
    pub async fn home(&self, auth: Option<&str>) -> Result<Home> {
        self.get("home", auth).await
    }

    #[instrument(skip_all, fields(include_all = %include_all))]
    pub async fn list_users(&self, include_all: bool, auth: Option<&str>) -> Result<Vec<User>> {
        let path = Query::new().flag_if("includeAll", include_all).finish("users");
        let page: IndexResultResponse<User> = self.get(&path, auth).await?;
        Ok(page.data)
    }

    /// Invite a user to the organization.
    #[instrument(skip_all, fields(send_email = %send_email))]
    pub async fn add_user(&self, user: &User, send_email: bool, auth: Option<&str>) -> Result<User> {
        if user.email.as_deref().map_or(true, |e| e.trim().is_empty()) {
            return Err(SmartsheetError::Validation(
                "User email cannot be blank".to_string(),
            ));
        }

        let path = Query::new().param("sendEmail", send_email).finish("users");
        let response: ResultResponse<User> = self.post(&path, user, auth).await?;
        into_result(response, "add_user")
    }

    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn update_user(&self, user_id: i64, user: &User, auth: Option<&str>) -> Result<User> {
        require_id("user id", user_id)?;

        let response: ResultResponse<User> =
            self.put(&format!("users/{}", user_id), user, auth).await?;
        into_result(response, "update_user")
    }

    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn remove_user(
        &self,
        user_id: i64,
        removal: &UserRemoval,
        auth: Option<&str>,
    ) -> Result<Acknowledgement> {
        require_id("user id", user_id)?;
        if let Some(transfer_to) = removal.transfer_to {
            require_id("transfer-to user id", transfer_to)?;
        }

        let mut query = Query::new();
        if let Some(transfer_to) = removal.transfer_to {
            query = query
                .param("transferTo", transfer_to)
                .param("transferSheets", removal.transfer_sheets);
        }
        let path = query
            .param("removeFromSharing", removal.remove_from_sharing)
            .finish(format!("users/{}", user_id));

        self.delete(&path, auth).await
    }
}
