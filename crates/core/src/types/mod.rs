//! Core value types.
//!
//! Type-safe wrappers for the domain concepts shared by the catalog, the cart
//! and the account area.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::ProductId;
pub use price::{CurrencyCode, Price, UnknownCurrency, format_money};
pub use status::{FinancialStatus, FulfillmentStatus};
