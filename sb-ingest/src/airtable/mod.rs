//! Remote tabular source access
//!
//! `client` pulls raw record pages; `fields` converts the untyped field
//! bags into typed records at the fetch boundary. No downstream module
//! touches a raw field bag.

pub mod client;
pub mod fields;

pub use client::AirtableClient;
