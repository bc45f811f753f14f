//! File and link attachments.
//!
//! File uploads send the raw bytes through the executor's upload path;
//! links are plain JSON posts.

use core_client::FormFile;
use core_models::{Attachment, IndexResultResponse, ResultResponse};
use tokio::io::AsyncRead;
use tracing::instrument;

use crate::client::{into_result, require_id, require_text, SmartsheetClient};
use crate::error::{Result, SmartsheetError};
use crate::types::Acknowledgement;

impl SmartsheetClient {
    #[instrument(skip_all, fields(sheet_id = %sheet_id, row_id = %row_id, file_name = %file_name))]
    #[allow(clippy::too_many_arguments)]
    pub async fn attach_file_to_row<R>(
        &self,
        sheet_id: i64,
        row_id: i64,
        file_name: &str,
        length: u64,
        reader: R,
        content_type: Option<&str>,
        auth: Option<&str>,
    ) -> Result<Attachment>
    where
        R: AsyncRead + Unpin + Send,
    {
        require_id("sheet id", sheet_id)?;
        require_id("row id", row_id)?;

        let path = format!("sheets/{}/rows/{}/attachments", sheet_id, row_id);
        self.upload(&path, file_name, length, reader, content_type, auth)
            .await
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, row_id = %row_id, file_name = %file.file_name))]
    pub async fn attach_form_file_to_row<R>(
        &self,
        sheet_id: i64,
        row_id: i64,
        file: FormFile<R>,
        auth: Option<&str>,
    ) -> Result<Attachment>
    where
        R: AsyncRead + Unpin + Send,
    {
        require_id("sheet id", sheet_id)?;
        require_id("row id", row_id)?;

        let path = format!("sheets/{}/rows/{}/attachments", sheet_id, row_id);
        self.upload_file(&path, file, auth).await
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, file_name = %file_name))]
    pub async fn attach_file_to_sheet<R>(
        &self,
        sheet_id: i64,
        file_name: &str,
        length: u64,
        reader: R,
        content_type: Option<&str>,
        auth: Option<&str>,
    ) -> Result<Attachment>
    where
        R: AsyncRead + Unpin + Send,
    {
        require_id("sheet id", sheet_id)?;

        let path = format!("sheets/{}/attachments", sheet_id);
        self.upload(&path, file_name, length, reader, content_type, auth)
            .await
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, file_name = %file.file_name))]
    pub async fn attach_form_file_to_sheet<R>(
        &self,
        sheet_id: i64,
        file: FormFile<R>,
        auth: Option<&str>,
    ) -> Result<Attachment>
    where
        R: AsyncRead + Unpin + Send,
    {
        require_id("sheet id", sheet_id)?;
        self.upload_file(&format!("sheets/{}/attachments", sheet_id), file, auth)
            .await
    }

    /// Upload a new version of an existing file attachment.
    #[instrument(skip_all, fields(sheet_id = %sheet_id, attachment_id = %attachment_id))]
    #[allow(clippy::too_many_arguments)]
    pub async fn attach_new_file_version<R>(
        &self,
        sheet_id: i64,
        attachment_id: i64,
        file_name: &str,
        length: u64,
        reader: R,
        content_type: Option<&str>,
        auth: Option<&str>,
    ) -> Result<Attachment>
    where
        R: AsyncRead + Unpin + Send,
    {
        require_id("sheet id", sheet_id)?;
        require_id("attachment id", attachment_id)?;

        let path = format!("sheets/{}/attachments/{}/versions", sheet_id, attachment_id);
        self.upload(&path, file_name, length, reader, content_type, auth)
            .await
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, attachment_id = %attachment_id))]
    pub async fn attach_new_form_file_version<R>(
        &self,
        sheet_id: i64,
        attachment_id: i64,
        file: FormFile<R>,
        auth: Option<&str>,
    ) -> Result<Attachment>
    where
        R: AsyncRead + Unpin + Send,
    {
        require_id("sheet id", sheet_id)?;
        require_id("attachment id", attachment_id)?;

        let path = format!("sheets/{}/attachments/{}/versions", sheet_id, attachment_id);
        self.upload_file(&path, file, auth).await
    }

    /// Attach a link (plain URL, Google Drive, Box, ...) to a row.
    #[instrument(skip_all, fields(sheet_id = %sheet_id, row_id = %row_id))]
    pub async fn attach_url_to_row(
        &self,
        sheet_id: i64,
        row_id: i64,
        attachment: &Attachment,
        auth: Option<&str>,
    ) -> Result<Attachment> {
        require_id("sheet id", sheet_id)?;
        require_id("row id", row_id)?;
        require_link(attachment)?;

        let response: ResultResponse<Attachment> = self
            .post(
                &format!("sheets/{}/rows/{}/attachments", sheet_id, row_id),
                attachment,
                auth,
            )
            .await?;
        into_result(response, "attach_url_to_row")
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    pub async fn attach_url_to_sheet(
        &self,
        sheet_id: i64,
        attachment: &Attachment,
        auth: Option<&str>,
    ) -> Result<Attachment> {
        require_id("sheet id", sheet_id)?;
        require_link(attachment)?;

        let response: ResultResponse<Attachment> = self
            .post(&format!("sheets/{}/attachments", sheet_id), attachment, auth)
            .await?;
        into_result(response, "attach_url_to_sheet")
    }

    /// Attachments on the sheet and all of its rows.
    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    pub async fn list_attachments(
        &self,
        sheet_id: i64,
        auth: Option<&str>,
    ) -> Result<Vec<Attachment>> {
        require_id("sheet id", sheet_id)?;

        let page: IndexResultResponse<Attachment> = self
            .get(&format!("sheets/{}/attachments", sheet_id), auth)
            .await?;
        Ok(page.data)
    }

    /// Attachment metadata, including a short-lived download `url`.
    #[instrument(skip_all, fields(sheet_id = %sheet_id, attachment_id = %attachment_id))]
    pub async fn get_attachment(
        &self,
        sheet_id: i64,
        attachment_id: i64,
        auth: Option<&str>,
    ) -> Result<Attachment> {
        require_id("sheet id", sheet_id)?;
        require_id("attachment id", attachment_id)?;

        self.get(
            &format!("sheets/{}/attachments/{}", sheet_id, attachment_id),
            auth,
        )
        .await
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, attachment_id = %attachment_id))]
    pub async fn delete_attachment(
        &self,
        sheet_id: i64,
        attachment_id: i64,
        auth: Option<&str>,
    ) -> Result<Acknowledgement> {
        require_id("sheet id", sheet_id)?;
        require_id("attachment id", attachment_id)?;

        self.delete(
            &format!("sheets/{}/attachments/{}", sheet_id, attachment_id),
            auth,
        )
        .await
    }

    async fn upload<R>(
        &self,
        path: &str,
        file_name: &str,
        length: u64,
        reader: R,
        content_type: Option<&str>,
        auth: Option<&str>,
    ) -> Result<Attachment>
    where
        R: AsyncRead + Unpin + Send,
    {
        let response: ResultResponse<Attachment> = self
            .executor()
            .upload_bytes(
                path,
                file_name,
                length,
                reader,
                content_type,
                auth,
                self.call_options(),
            )
            .await?;
        into_result(response, "attach_file")
    }

    async fn upload_file<R>(
        &self,
        path: &str,
        file: FormFile<R>,
        auth: Option<&str>,
    ) -> Result<Attachment>
    where
        R: AsyncRead + Unpin + Send,
    {
        let response: ResultResponse<Attachment> = self
            .executor()
            .upload_form_file(path, file, auth, self.call_options())
            .await?;
        into_result(response, "attach_file")
    }
}

fn require_link(attachment: &Attachment) -> Result<()> {
    require_text("Attachment url", attachment.url.as_deref().unwrap_or_default())?;
    if attachment.attachment_type.is_none() {
        return Err(SmartsheetError::Validation(
            "Link attachments need an attachment type".to_string(),
        ));
    }
    Ok(())
}
