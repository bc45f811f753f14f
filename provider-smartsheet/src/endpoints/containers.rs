//! Workspaces and folders.

use core_models::{
    ContainerDestination, Folder, IndexResultResponse, Report, ResultResponse, Sheet, Template,
    Workspace,
};
use tracing::instrument;

use crate::client::{into_result, require_id, require_text, Query, SmartsheetClient};
use crate::error::Result;

impl SmartsheetClient {
    #[instrument(skip_all)]
    pub async fn create_workspace(&self, name: &str, auth: Option<&str>) -> Result<Workspace> {
        let name = require_text("Workspace name", name)?;

        let response: ResultResponse<Workspace> = self
            .post("workspaces", &Workspace::named(name), auth)
            .await?;
        into_result(response, "create_workspace")
    }

    /// Fetch a workspace. With `load_all` the whole folder tree is returned.
    #[instrument(skip_all, fields(workspace_id = %workspace_id, load_all = %load_all))]
    pub async fn get_workspace(
        &self,
        workspace_id: i64,
        load_all: bool,
        auth: Option<&str>,
    ) -> Result<Workspace> {
        require_id("workspace id", workspace_id)?;

        let path = Query::new()
            .param("loadAll", load_all)
            .finish(format!("workspaces/{}", workspace_id));
        self.get(&path, auth).await
    }

    #[instrument(skip_all)]
    pub async fn list_workspaces(&self, auth: Option<&str>) -> Result<Vec<Workspace>> {
        let page: IndexResultResponse<Workspace> = self.get("workspaces", auth).await?;
        Ok(page.data)
    }

    #[instrument(skip_all, fields(workspace_id = %workspace_id, load_all = %load_all))]
    pub async fn folders_for_workspace(
        &self,
        workspace_id: i64,
        load_all: bool,
        auth: Option<&str>,
    ) -> Result<Vec<Folder>> {
        let workspace = self.get_workspace(workspace_id, load_all, auth).await?;
        Ok(workspace.folders.unwrap_or_default())
    }

    /// Sheets at the top level of a workspace.
    #[instrument(skip_all, fields(workspace_id = %workspace_id))]
    pub async fn sheets_for_workspace(
        &self,
        workspace_id: i64,
        auth: Option<&str>,
    ) -> Result<Vec<Sheet>> {
        let workspace = self.get_workspace(workspace_id, false, auth).await?;
        Ok(workspace.sheets.unwrap_or_default())
    }

    #[instrument(skip_all, fields(workspace_id = %workspace_id))]
    pub async fn reports_for_workspace(
        &self,
        workspace_id: i64,
        auth: Option<&str>,
    ) -> Result<Vec<Report>> {
        let workspace = self.get_workspace(workspace_id, false, auth).await?;
        Ok(workspace.reports.unwrap_or_default())
    }

    #[instrument(skip_all, fields(workspace_id = %workspace_id))]
    pub async fn templates_for_workspace(
        &self,
        workspace_id: i64,
        auth: Option<&str>,
    ) -> Result<Vec<Template>> {
        let workspace = self.get_workspace(workspace_id, false, auth).await?;
        Ok(workspace.templates.unwrap_or_default())
    }

    #[instrument(skip_all, fields(folder_id = %folder_id))]
    pub async fn get_folder(&self, folder_id: i64, auth: Option<&str>) -> Result<Folder> {
        require_id("folder id", folder_id)?;
        self.get(&format!("folders/{}", folder_id), auth).await
    }

    /// Copy a folder, with its data, into another folder.
    #[instrument(skip_all, fields(folder_id = %folder_id, destination_id = %destination_id))]
    pub async fn copy_folder(
        &self,
        folder_id: i64,
        destination_id: i64,
        new_name: &str,
        auth: Option<&str>,
    ) -> Result<Folder> {
        require_id("folder id", folder_id)?;
        require_id("destination folder id", destination_id)?;
        let new_name = require_text("Folder name", new_name)?;

        let path = Query::new()
            .param("include", "data")
            .finish(format!("folders/{}/copy", folder_id));
        let destination = ContainerDestination::folder(destination_id, new_name);

        let response: ResultResponse<Folder> = self.post(&path, &destination, auth).await?;
        into_result(response, "copy_folder")
    }
}
