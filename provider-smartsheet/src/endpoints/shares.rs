//! Sharing sheets, workspaces, reports and dashboards.

use core_models::{ResultResponse, Share};
use tracing::instrument;

use crate::client::{require_any, require_id, Query, SmartsheetClient};
use crate::error::{Result, SmartsheetError};

impl SmartsheetClient {
    #[instrument(skip_all, fields(sheet_id = %sheet_id, shares = shares.len()))]
    pub async fn share_sheet(
        &self,
        sheet_id: i64,
        shares: &[Share],
        send_email: bool,
        auth: Option<&str>,
    ) -> Result<Vec<Share>> {
        require_id("sheet id", sheet_id)?;
        self.share("sheets", sheet_id, shares, send_email, auth).await
    }

    #[instrument(skip_all, fields(workspace_id = %workspace_id, shares = shares.len()))]
    pub async fn share_workspace(
        &self,
        workspace_id: i64,
        shares: &[Share],
        send_email: bool,
        auth: Option<&str>,
    ) -> Result<Vec<Share>> {
        require_id("workspace id", workspace_id)?;
        self.share("workspaces", workspace_id, shares, send_email, auth)
            .await
    }

    #[instrument(skip_all, fields(report_id = %report_id, shares = shares.len()))]
    pub async fn share_report(
        &self,
        report_id: i64,
        shares: &[Share],
        send_email: bool,
        auth: Option<&str>,
    ) -> Result<Vec<Share>> {
        require_id("report id", report_id)?;
        self.share("reports", report_id, shares, send_email, auth).await
    }

    /// Share a dashboard.
    #[instrument(skip_all, fields(sight_id = %sight_id, shares = shares.len()))]
    pub async fn share_sight(
        &self,
        sight_id: i64,
        shares: &[Share],
        send_email: bool,
        auth: Option<&str>,
    ) -> Result<Vec<Share>> {
        require_id("sight id", sight_id)?;
        self.share("sights", sight_id, shares, send_email, auth).await
    }

    async fn share(
        &self,
        collection: &str,
        object_id: i64,
        shares: &[Share],
        send_email: bool,
        auth: Option<&str>,
    ) -> Result<Vec<Share>> {
        require_any("share", shares)?;
        let body = shares.iter().map(outgoing_share).collect::<Result<Vec<_>>>()?;

        let path = Query::new()
            .param("sendEmail", send_email)
            .finish(format!("{}/{}/shares", collection, object_id));

        let response: ResultResponse<Vec<Share>> = self.post(&path, &body, auth).await?;
        Ok(response.into_result().unwrap_or_default())
    }
}

/// Strip what the server assigns and check the grantee.
fn outgoing_share(share: &Share) -> Result<Share> {
    if share.email.is_none() && share.group_id.is_none() {
        return Err(SmartsheetError::Validation(
            "Share needs an email or a group id".to_string(),
        ));
    }
    if share.access_level.is_none() {
        return Err(SmartsheetError::Validation(
            "Share needs an access level".to_string(),
        ));
    }

    Ok(Share {
        id: None,
        user_id: None,
        share_type: None,
        created_at: None,
        name: None,
        scope: None,
        ..share.clone()
    })
}
