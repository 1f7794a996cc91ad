//! Authentication: validation of hosted-auth session tokens.

pub mod jwt;
