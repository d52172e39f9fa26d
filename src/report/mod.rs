//! Read-only reports derived from the user's financial data.

mod emergency_fund;

pub use emergency_fund::{EmergencyFundReport, emergency_fund_report, get_emergency_fund_endpoint};
