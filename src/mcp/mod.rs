//! MCP transport adapter.

mod server;

pub use server::ScorecardServer;
