//! Sales-agent price adjustment.
//!
//! Sales agents may override a cart line's price, but not below the floor
//! price (`cost * floor multiplier`). Managers and admins are not restricted.
//! A missing role is treated like an agent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of the person adjusting a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Agent,
    Manager,
    Admin,
    #[serde(other)]
    Unknown,
}

impl AgentRole {
    /// Parse a role name; `None`, blank or unrecognized names are `Unknown`.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_ascii_lowercase()).as_deref() {
            Some("agent") => Self::Agent,
            Some("manager") => Self::Manager,
            Some("admin") => Self::Admin,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::Unknown => "unknown",
        }
    }

    /// Whether adjustments by this role must respect the floor price.
    pub fn is_floor_restricted(&self) -> bool {
        matches!(self, Self::Agent | Self::Unknown)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdjustmentError {
    #[error("price cannot be empty")]
    Empty,

    #[error("price must be a plain decimal number, got {0:?}")]
    Malformed(String),

    #[error("price cannot be less than floor price {floor:.2}")]
    BelowFloor { floor: f64 },
}

/// Floor price for a line, or `None` when no floor multiplier is configured.
pub fn floor_price(cost: f64, floor_multiplier: f64) -> Option<f64> {
    if !floor_multiplier.is_finite() || floor_multiplier == 0.0 || !cost.is_finite() {
        return None;
    }
    Some(cost * floor_multiplier)
}

/// Digits with at most one decimal point, and at least one digit.
fn is_plain_decimal(input: &str) -> bool {
    let mut seen_dot = false;
    let mut seen_digit = false;
    for c in input.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

/// Validate an agent's price input.
///
/// Returns the parsed price when it may be submitted.
pub fn validate_adjustment(
    input: &str,
    cost: f64,
    floor_multiplier: f64,
    role: AgentRole,
) -> Result<f64, AdjustmentError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AdjustmentError::Empty);
    }
    if !is_plain_decimal(trimmed) {
        return Err(AdjustmentError::Malformed(trimmed.to_string()));
    }
    let price: f64 = trimmed
        .parse()
        .map_err(|_| AdjustmentError::Malformed(trimmed.to_string()))?;

    if role.is_floor_restricted() {
        if let Some(floor) = floor_price(cost, floor_multiplier) {
            if price < floor {
                tracing::debug!(role = role.as_str(), price, floor, "adjustment below floor rejected");
                return Err(AdjustmentError::BelowFloor { floor });
            }
        }
    }

    Ok(price)
}

/// Summary rows shown above the adjuster input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjusterSummary {
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_price: Option<f64>,
    pub role: AgentRole,
    pub floor_restricted: bool,
}

impl AdjusterSummary {
    pub fn new(cost: f64, floor_multiplier: f64, role: AgentRole) -> Self {
        Self {
            cost,
            floor_price: floor_price(cost, floor_multiplier),
            role,
            floor_restricted: role.is_floor_restricted(),
        }
    }
}
