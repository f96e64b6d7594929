use axum::http::HeaderMap;

use storefront_pricing::{ActivationCode, AgentRole};

/// Header carrying the sales agent's role.
pub const AGENT_ROLE_HEADER: &str = "x-agent-role";

/// Activation code in effect for a request.
///
/// Inserted by the activation middleware on every request; `None` when neither
/// the query string nor the cookie carried a code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationContext {
    code: Option<ActivationCode>,
}

impl ActivationContext {
    pub fn new(code: Option<ActivationCode>) -> Self {
        Self { code }
    }

    pub fn code(&self) -> Option<&ActivationCode> {
        self.code.as_ref()
    }
}

/// Role of the agent making a request. Missing or unreadable headers are `Unknown`.
pub fn agent_role(headers: &HeaderMap) -> AgentRole {
    let name = headers.get(AGENT_ROLE_HEADER).and_then(|v| v.to_str().ok());
    AgentRole::from_name(name)
}
