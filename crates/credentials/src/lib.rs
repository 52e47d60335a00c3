//! `wardflow-credentials` — credential lifecycle management.
//!
//! System-generated passwords, timed verification/reset tokens, and the
//! one-way system-password rotation. Hashing goes through the [`Hasher`]
//! seam; plaintext secrets never touch a store.

pub mod hasher;
pub mod lifecycle;

pub use hasher::Hasher;
pub use lifecycle::{
    consume_timed_token, set_password, verify_and_rotate, CredentialPolicy, IssuedSecret,
    TimedToken,
};
