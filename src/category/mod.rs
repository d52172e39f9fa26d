//! Categories for classifying transactions, with system-seeded defaults.

mod db;
mod domain;
mod endpoints;

pub use db::{
    CARD_INVOICE_CATEGORY, EMERGENCY_FUND_CATEGORY, category_is_referenced, create_category,
    create_category_table, delete_category, get_category, list_categories,
    seed_default_categories, update_category,
};
pub use domain::{Category, CategoryData, CategoryId, CategoryName};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
    update_category_endpoint,
};
