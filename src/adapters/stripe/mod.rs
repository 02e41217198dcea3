//! Stripe adapter for the payment provider port.

mod payment_adapter;

pub use payment_adapter::{StripeConfig, StripePaymentAdapter};
