//! HTTP request handlers, one module per resource.

pub mod account;
pub mod appointments;
pub mod bookings;
pub mod checkout;
pub mod health;
pub mod listings;
pub mod profile;
pub mod seo;
pub mod webhooks;
