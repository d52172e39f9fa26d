//! Credit cards.

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_credit_card, create_credit_card_table, delete_credit_card, get_credit_card,
    list_credit_cards, update_credit_card,
};
pub use domain::{CardId, CreditCard, CreditCardData};
pub use endpoints::{
    create_card_endpoint, delete_card_endpoint, get_card_endpoint, list_cards_endpoint,
    update_card_endpoint,
};
