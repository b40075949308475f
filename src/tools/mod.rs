//! MCP tool parameter and acknowledgment types.
//!
//! All parameter structs derive `Deserialize + JsonSchema` for MCP tool
//! registration. The acknowledgment struct derives `Serialize` for JSON
//! output.

pub mod params;

pub use params::*;
