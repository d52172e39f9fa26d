//! User feedback tickets with image attachments.

mod db;
mod domain;
mod endpoints;
mod store;

pub use db::{
    create_feedback, create_feedback_table, list_all_feedback, update_feedback_status,
};
pub use domain::{Feedback, FeedbackData, FeedbackId, FeedbackKind, FeedbackStatus};
pub use endpoints::{
    create_feedback_endpoint, list_feedback_endpoint, update_feedback_status_endpoint,
    upload_attachment_endpoint,
};
pub use store::{LocalObjectStore, ObjectStore};
