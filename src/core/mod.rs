//! Core types: provider error model and JSON-RPC envelopes.

pub mod error;
pub mod mcp;
