//! Session authentication: registration, login, private cookies and password
//! reset tokens.

pub mod cookie;
pub mod log_in;
pub mod middleware;
mod password;
pub mod register;
pub mod reset;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use log_in::{LogInData, SessionUser, post_log_in, post_log_out};
pub use middleware::{AuthState, auth_guard};
pub use password::{MIN_PASSWORD_LENGTH, PasswordHash, ValidatedPassword};
pub use register::{RegisterData, register_user};
pub use reset::{
    LogMailSender, MailSender, create_password_reset_table, post_forgot_password,
    post_reset_password,
};
