//! # Core Models
//!
//! Wire types for the Smartsheet REST API and the in-memory sheet model.
//!
//! ## Overview
//!
//! - [`Sheet`], [`Column`], [`Row`] and [`Cell`] with positional
//!   reconciliation ([`Sheet::reconcile`]), title/id lookups and write-side
//!   normalization ([`Row::build`], [`Sheet::prepare_rows`])
//! - [`Nullable`] for fields where an explicit `null` differs from absence
//! - Response envelopes ([`ResultResponse`], [`IndexResultResponse`],
//!   [`ErrorResponse`]) and the [`ApiResult`] marker
//! - Everything else the API exchanges: attachments, discussions, users,
//!   groups, shares, containers, webhooks, emails
//!
//! All types serialize with camelCase names and omit empty optional fields.

pub mod attachment;
pub mod cell;
pub mod column;
pub mod containers;
pub mod error;
pub mod messaging;
pub mod nullable;
pub mod result;
pub mod row;
pub mod sheet;
pub mod user;
pub mod webhook;

pub use attachment::{Attachment, AttachmentSubType, AttachmentType, Comment, Discussion};
pub use cell::{Cell, CellHistory, CellLink, CellValue, Hyperlink, FORMULA_MARKER};
pub use column::{
    AutoNumberFormat, Column, ColumnFilter, ColumnType, ContactOption, Criteria, SystemColumnType,
};
pub use containers::{
    ContainerDestination, CrossSheetReference, DestinationType, Folder, Home, PaperSize, Report,
    SheetCopyInclusion, Sight, Template, Workspace,
};
pub use error::{ModelError, Result};
pub use messaging::{Email, MultiRowEmail, Recipient, RowEmail, UpdateRequest};
pub use nullable::Nullable;
pub use result::{
    ApiResult, BulkItemFailure, ErrorResponse, IndexResultResponse, ResultResponse,
    SUCCESS_MESSAGE,
};
pub use row::{CopyOrMoveRowDirective, CopyOrMoveRowResult, Placement, Row, RowBuild, RowMapping};
pub use sheet::{Sheet, UserSettings};
pub use user::{AccessLevel, Account, AlternateEmail, Group, GroupMember, Share, User};
pub use webhook::{Webhook, WebhookCallback, WebhookEvent, WebhookStats, WebhookSubscope};
