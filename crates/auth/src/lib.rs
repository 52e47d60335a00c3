//! `wardflow-auth` — access token issuing and verification.
//!
//! Tokens are opaque bearer strings carrying an actor identifier and a
//! standard expiry window. This crate is intentionally decoupled from HTTP
//! and storage; the admin gate in the API layer composes `verify` with a
//! hospital lookup.

pub mod claims;
pub mod token;

pub use claims::{validate_claims, AccessClaims, TokenValidationError};
pub use token::{Hs256TokenIssuer, TokenError, TokenIssuer};
