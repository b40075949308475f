//! notify-mcp library.
//!
//! Provides the [`server::NotifyMcpServer`] MCP server handler, the
//! notification [`dispatch::Dispatcher`], and the channel backend traits.
//! Used by the `notify-mcp` binary and available for integration testing.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod server;
pub mod sound;
pub mod tools;
pub mod visual;
