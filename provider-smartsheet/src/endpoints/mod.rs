//! Endpoint groups, each an `impl` block on [`SmartsheetClient`].
//!
//! [`SmartsheetClient`]: crate::SmartsheetClient

mod attachments;
mod columns;
mod containers;
mod discussions;
mod groups;
mod references;
pub(crate) mod rows;
mod shares;
pub(crate) mod sheets;
mod users;
mod webhooks;
