//! Typed client for the hosted payment processor.
//!
//! Covers the three surfaces this backend consumes: customers, hosted
//! checkout sessions, and the invoice list, plus verification of the signed
//! webhooks the processor sends back.

pub mod client;
pub mod webhook;

pub use client::{
    CheckoutSession, CheckoutSessionParams, Customer, Invoice, PaymentsClient, PaymentsConfig,
    PaymentsError,
};
pub use webhook::{
    sign_payload, verify_signature, CheckoutSessionObject, CustomerObject, SignatureError,
    WebhookEvent, DEFAULT_TOLERANCE_SECS,
};
