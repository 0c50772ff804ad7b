// src/agents/agent_type.rs

use crate::types::AgentKind;

impl AgentKind {
    /// Strategic agents re-ballot at every trial price; exogenous flow is fixed for the round.
    pub fn is_strategic(self) -> bool {
        !matches!(self, AgentKind::Exogenous)
    }

    pub fn label(self) -> &'static str {
        match self {
            AgentKind::Threshold => "threshold",
            AgentKind::Trend => "trend",
            AgentKind::Exogenous => "exogenous",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{AgentId, AgentKind};

    #[test]
    fn test_only_exogenous_flow_is_non_strategic() {
        assert!(AgentKind::Threshold.is_strategic());
        assert!(AgentKind::Trend.is_strategic());
        assert!(!AgentKind::Exogenous.is_strategic());
    }

    #[test]
    fn test_ids_display_with_their_label() {
        assert_eq!(AgentId::new(AgentKind::Trend, 12).to_string(), "trend-12");
    }
}
