//! Reusable transaction templates.

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_template, create_template_table, delete_template, get_template, list_templates,
    update_template, use_template,
};
pub use domain::{TemplateData, TemplateId, TransactionTemplate};
pub use endpoints::{
    create_template_endpoint, delete_template_endpoint, list_templates_endpoint,
    update_template_endpoint, use_template_endpoint,
};
