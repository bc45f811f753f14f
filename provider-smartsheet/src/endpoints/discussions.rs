//! Discussions and their comments.

use core_models::{Comment, Discussion, IndexResultResponse, ResultResponse};
use tracing::instrument;

use crate::client::{into_result, require_id, require_text, Query, SmartsheetClient};
use crate::error::Result;
use crate::types::{Acknowledgement, DiscussionQuery};

impl SmartsheetClient {
    /// Open a discussion on a row with its first comment.
    #[instrument(skip_all, fields(sheet_id = %sheet_id, row_id = %row_id))]
    pub async fn create_discussion_on_row(
        &self,
        sheet_id: i64,
        row_id: i64,
        comment_text: &str,
        auth: Option<&str>,
    ) -> Result<Discussion> {
        require_id("sheet id", sheet_id)?;
        require_id("row id", row_id)?;

        let path = format!("sheets/{}/rows/{}/discussions", sheet_id, row_id);
        self.open_discussion(&path, comment_text, auth).await
    }

    /// Open a sheet-level discussion with its first comment.
    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    pub async fn create_discussion_on_sheet(
        &self,
        sheet_id: i64,
        comment_text: &str,
        auth: Option<&str>,
    ) -> Result<Discussion> {
        require_id("sheet id", sheet_id)?;

        let path = format!("sheets/{}/discussions", sheet_id);
        self.open_discussion(&path, comment_text, auth).await
    }

    async fn open_discussion(
        &self,
        path: &str,
        comment_text: &str,
        auth: Option<&str>,
    ) -> Result<Discussion> {
        let text = require_text("Comment text", comment_text)?;
        let discussion = Discussion {
            comment: Some(Comment::new(text)),
            ..Default::default()
        };

        let response: ResultResponse<Discussion> = self.post(path, &discussion, auth).await?;
        into_result(response, "create_discussion")
    }

    /// Discussions on the sheet and all of its rows.
    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    pub async fn list_discussions(
        &self,
        sheet_id: i64,
        query: &DiscussionQuery,
        auth: Option<&str>,
    ) -> Result<Vec<Discussion>> {
        require_id("sheet id", sheet_id)?;

        let path = discussion_query(query).finish(format!("sheets/{}/discussions", sheet_id));
        let page: IndexResultResponse<Discussion> = self.get(&path, auth).await?;
        Ok(page.data)
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, row_id = %row_id))]
    pub async fn list_row_discussions(
        &self,
        sheet_id: i64,
        row_id: i64,
        query: &DiscussionQuery,
        auth: Option<&str>,
    ) -> Result<Vec<Discussion>> {
        require_id("sheet id", sheet_id)?;
        require_id("row id", row_id)?;

        let path = discussion_query(query)
            .finish(format!("sheets/{}/rows/{}/discussions", sheet_id, row_id));
        let page: IndexResultResponse<Discussion> = self.get(&path, auth).await?;
        Ok(page.data)
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, discussion_id = %discussion_id))]
    pub async fn get_discussion(
        &self,
        sheet_id: i64,
        discussion_id: i64,
        auth: Option<&str>,
    ) -> Result<Discussion> {
        require_id("sheet id", sheet_id)?;
        require_id("discussion id", discussion_id)?;

        self.get(
            &format!("sheets/{}/discussions/{}", sheet_id, discussion_id),
            auth,
        )
        .await
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, discussion_id = %discussion_id))]
    pub async fn delete_discussion(
        &self,
        sheet_id: i64,
        discussion_id: i64,
        auth: Option<&str>,
    ) -> Result<Acknowledgement> {
        require_id("sheet id", sheet_id)?;
        require_id("discussion id", discussion_id)?;

        self.delete(
            &format!("sheets/{}/discussions/{}", sheet_id, discussion_id),
            auth,
        )
        .await
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, discussion_id = %discussion_id))]
    pub async fn add_comment(
        &self,
        sheet_id: i64,
        discussion_id: i64,
        text: &str,
        auth: Option<&str>,
    ) -> Result<Comment> {
        require_id("sheet id", sheet_id)?;
        require_id("discussion id", discussion_id)?;
        let text = require_text("Comment text", text)?;

        let response: ResultResponse<Comment> = self
            .post(
                &format!("sheets/{}/discussions/{}/comments", sheet_id, discussion_id),
                &Comment::new(text),
                auth,
            )
            .await?;
        into_result(response, "add_comment")
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, comment_id = %comment_id))]
    pub async fn edit_comment(
        &self,
        sheet_id: i64,
        comment_id: i64,
        text: &str,
        auth: Option<&str>,
    ) -> Result<Comment> {
        require_id("sheet id", sheet_id)?;
        require_id("comment id", comment_id)?;
        let text = require_text("Comment text", text)?;

        let response: ResultResponse<Comment> = self
            .put(
                &format!("sheets/{}/comments/{}", sheet_id, comment_id),
                &Comment::new(text),
                auth,
            )
            .await?;
        into_result(response, "edit_comment")
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, comment_id = %comment_id))]
    pub async fn get_comment(
        &self,
        sheet_id: i64,
        comment_id: i64,
        auth: Option<&str>,
    ) -> Result<Comment> {
        require_id("sheet id", sheet_id)?;
        require_id("comment id", comment_id)?;

        self.get(&format!("sheets/{}/comments/{}", sheet_id, comment_id), auth)
            .await
    }

    #[instrument(skip_all, fields(sheet_id = %sheet_id, comment_id = %comment_id))]
    pub async fn delete_comment(
        &self,
        sheet_id: i64,
        comment_id: i64,
        auth: Option<&str>,
    ) -> Result<Acknowledgement> {
        require_id("sheet id", sheet_id)?;
        require_id("comment id", comment_id)?;

        self.delete(&format!("sheets/{}/comments/{}", sheet_id, comment_id), auth)
            .await
    }
}

fn discussion_query(query: &DiscussionQuery) -> Query {
    let mut include = Vec::new();
    if query.include_comments {
        include.push("comments");
        if query.include_attachments {
            include.push("attachments");
        }
    }

    Query::new()
        .list("include", include)
        .flag_if("includeAll", query.include_all)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discussion_query() {
        let render = |q: DiscussionQuery| discussion_query(&q).finish("d");

        assert_eq!(render(DiscussionQuery::default()), "d");
        assert_eq!(
            render(DiscussionQuery {
                include_attachments: true,
                ..Default::default()
            }),
            "d"
        );
        assert_eq!(
            render(DiscussionQuery {
                include_comments: true,
                include_attachments: true,
                include_all: true,
            }),
            "d?include=comments,attachments&includeAll=true"
        );
    }
}
