//! # Messenger Security
//!
//! Argon2id password hashing. Plaintext passwords never reach the store.

mod hasher;

pub use hasher::*;
