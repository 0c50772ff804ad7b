// src/types/mod.rs

pub mod order;

pub use order::{AgentId, AgentKind, AgentState, Intent, Side};
