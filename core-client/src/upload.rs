//! Binary uploads
//!
//! Attachments are posted as the raw file bytes with the file name in a
//! `Content-Disposition` header. The source is read fully into memory first
//! and then sent through the same retry loop as JSON calls.

use std::path::Path;

use bridge_traits::http::HttpMethod;
use core_models::{ApiResult, ResultResponse};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, instrument, warn};

use crate::error::{ApiError, Result};
use crate::executor::{CallOptions, Outgoing, RequestExecutor};

const OCTET_STREAM: &str = "application/octet-stream";

/// A named byte source with a declared length.
pub struct FormFile<R> {
    pub file_name: String,
    pub length: u64,
    pub content_type: Option<String>,
    pub reader: R,
}

impl<R> FormFile<R> {
    pub fn new(file_name: impl Into<String>, length: u64, reader: R) -> Self {
        Self {
            file_name: file_name.into(),
            length,
            content_type: None,
            reader,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl FormFile<tokio::fs::File> {
    /// Open a file from disk, taking its name and length from the filesystem.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ApiError::Validation(format!("Path has no file name: {}", path.display()))
            })?
            .to_string();

        let file = tokio::fs::File::open(path).await?;
        let length = file.metadata().await?.len();

        Ok(Self::new(file_name, length, file))
    }
}

impl RequestExecutor {
    /// Upload bytes from `reader` and decode the wrapped result.
    #[instrument(skip_all, fields(path = %path, file_name = %file_name, length))]
    #[allow(clippy::too_many_arguments)]
    pub async fn upload_bytes<T, R>(
        &self,
        path: &str,
        file_name: &str,
        length: u64,
        mut reader: R,
        content_type: Option<&str>,
        auth: Option<&str>,
        options: &CallOptions,
    ) -> Result<ResultResponse<T>>
    where
        T: ApiResult,
        R: AsyncRead + Unpin + Send,
    {
        if file_name.trim().is_empty() {
            return Err(ApiError::Validation("File name is required".to_string()));
        }

        let url = self.resolve_url(path)?;
        let token = self.bearer(auth)?;

        let mut buffer = Vec::with_capacity(usize::try_from(length).unwrap_or(0));
        reader.read_to_end(&mut buffer).await?;
        drop(reader);

        if buffer.len() as u64 != length {
            warn!(
                declared = length,
                read = buffer.len(),
                "Upload length differs from declared length"
            );
        }
        debug!(bytes = buffer.len(), "Upload buffered");

        let outgoing = Outgoing::new(HttpMethod::Post, url)
            .bearer(token)
            .header("Content-Disposition", content_disposition(file_name))
            .header("Content-Length", buffer.len().to_string())
            .body(buffer, content_type.unwrap_or(OCTET_STREAM));

        let response = self.run(&outgoing, options).await?;
        serde_json::from_slice(&response.body).map_err(|e| ApiError::Deserialization {
            url: outgoing.url.clone(),
            message: e.to_string(),
        })
    }

    /// Upload a [`FormFile`]. The reader is consumed and closed whatever the
    /// outcome.
    pub async fn upload_form_file<T, R>(
        &self,
        path: &str,
        file: FormFile<R>,
        auth: Option<&str>,
        options: &CallOptions,
    ) -> Result<ResultResponse<T>>
    where
        T: ApiResult,
        R: AsyncRead + Unpin + Send,
    {
        let FormFile {
            file_name,
            length,
            content_type,
            reader,
        } = file;

        self.upload_bytes(
            path,
            &file_name,
            length,
            reader,
            content_type.as_deref(),
            auth,
            options,
        )
        .await
    }
}

fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| !matches!(c, '"' | '\r' | '\n'))
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}
