// src/agents/mod.rs

pub mod agent_trait;
pub mod agent_type;
pub mod exogenous_agent;
pub mod polling;
pub mod threshold_agent;
pub mod trend_agent;
