//! Text rendering: SMS bodies and HTML views.

pub mod message;
pub mod views;

pub use message::{compose_body, opt_out_link, render_message};
pub use views::Views;
