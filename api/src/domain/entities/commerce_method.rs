//! Shipping, payment and tax methods
//!
//! Methods are code-registered by modules at startup; a store picks from the
//! registered ones.

use serde::{Deserialize, Serialize};

/// Which checkout step a method serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Shipping,
    Payment,
    Tax,
}

impl std::fmt::Display for MethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodKind::Shipping => write!(f, "shipping"),
            MethodKind::Payment => write!(f, "payment"),
            MethodKind::Tax => write!(f, "tax"),
        }
    }
}

impl std::str::FromStr for MethodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shipping" => Ok(MethodKind::Shipping),
            "payment" => Ok(MethodKind::Payment),
            "tax" => Ok(MethodKind::Tax),
            _ => Err(format!("Unknown method kind: {}", s)),
        }
    }
}

/// A registered shipping method, payment method or tax provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommerceMethod {
    /// Registration name, unique per kind
    pub code: String,
    pub kind: MethodKind,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    /// Lower comes first
    pub priority: i32,
}

impl CommerceMethod {
    pub fn new(kind: MethodKind, code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            kind,
            name: name.to_string(),
            description: None,
            is_active: true,
            priority: 0,
        }
    }
}
