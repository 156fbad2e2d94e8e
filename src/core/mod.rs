//! Core library components.
//!
//! The envelope codec, key material handles, store backends and the secret
//! operations that compose them. Nothing in here prints or exits.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod keyring;
pub mod secrets;
pub mod store;
pub mod types;
