//! Inbound adapters translating external requests into domain use-cases.

pub mod http;
