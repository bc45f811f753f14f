//! Organization groups.

use core_models::{Group, GroupMember, IndexResultResponse, ResultResponse};
use tracing::instrument;

use crate::client::{into_result, require_any, require_id, require_text, Query, SmartsheetClient};
use crate::error::Result;
use crate::types::Acknowledgement;

impl SmartsheetClient {
    #[instrument(skip_all, fields(include_all = %include_all))]
    pub async fn list_groups(&self, include_all: bool, auth: Option<&str>) -> Result<Vec<Group>> {
        let path = Query::new().flag_if("includeAll", include_all).finish("groups");
        let page: IndexResultResponse<Group> = self.get(&path, auth).await?;
        Ok(page.data)
    }

    #[instrument(skip_all)]
    pub async fn create_group(&self, group: &Group, auth: Option<&str>) -> Result<Group> {
        require_text("Group name", group.name.as_deref().unwrap_or_default())?;

        let response: ResultResponse<Group> = self.post("groups", group, auth).await?;
        into_result(response, "create_group")
    }

    /// A group with its members.
    #[instrument(skip_all, fields(group_id = %group_id))]
    pub async fn get_group(&self, group_id: i64, auth: Option<&str>) -> Result<Group> {
        require_id("group id", group_id)?;
        self.get(&format!("groups/{}", group_id), auth).await
    }

    /// Rename a group, change its description or transfer ownership.
    #[instrument(skip_all, fields(group_id = %group_id))]
    pub async fn update_group(
        &self,
        group_id: i64,
        group: &Group,
        auth: Option<&str>,
    ) -> Result<Group> {
        require_id("group id", group_id)?;

        // Membership has its own endpoints.
        let body = Group {
            id: None,
            members: None,
            ..group.clone()
        };

        let response: ResultResponse<Group> =
            self.put(&format!("groups/{}", group_id), &body, auth).await?;
        into_result(response, "update_group")
    }

    #[instrument(skip_all, fields(group_id = %group_id))]
    pub async fn delete_group(&self, group_id: i64, auth: Option<&str>) -> Result<Acknowledgement> {
        require_id("group id", group_id)?;
        self.delete(&format!("groups/{}", group_id), auth).await
    }

    #[instrument(skip_all, fields(group_id = %group_id, members = members.len()))]
    pub async fn add_group_members(
        &self,
        group_id: i64,
        members: &[GroupMember],
        auth: Option<&str>,
    ) -> Result<Vec<GroupMember>> {
        require_id("group id", group_id)?;
        require_any("group member", members)?;

        let response: ResultResponse<Vec<GroupMember>> = self
            .post(&format!("groups/{}/members", group_id), members, auth)
            .await?;
        Ok(response.into_result().unwrap_or_default())
    }

    #[instrument(skip_all, fields(group_id = %group_id, user_id = %user_id))]
    pub async fn remove_group_member(
        &self,
        group_id: i64,
        user_id: i64,
        auth: Option<&str>,
    ) -> Result<Acknowledgement> {
        require_id("group id", group_id)?;
        require_id("user id", user_id)?;

        self.delete(&format!("groups/{}/members/{}", group_id, user_id), auth)
            .await
    }
}
