//! Business logic on top of the external APIs.
//!
//! - [`account`] - Customer sign in/up, recovery, session bootstrap, orders
//! - [`contact`] - Contact form relay to Formspree

pub mod account;
pub mod contact;

pub use account::{AccountError, AdminPanel, OrdersOutcome};
pub use contact::{ContactError, ContactMessage, FormSubmissionClient};
