//! Caller identity model
//!
//! Every service operation takes the authenticated caller as an explicit
//! `Principal` value instead of reading it from ambient request state.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role of an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Renter booking items from the catalog
    #[default]
    Customer,
    /// Item owner offering items for rent
    Host,
    /// Administrator with full access
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Customer => write!(f, "customer"),
            UserRole::Host => write!(f, "host"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl UserRole {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "customer" => Some(UserRole::Customer),
            "host" => Some(UserRole::Host),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// Check if role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Check if role may act on identity decisions (admin or host)
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Host)
    }
}

/// Authenticated caller of a service operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// User id supplied by the authentication middleware
    pub user_id: Uuid,

    /// Role supplied by the authentication middleware
    pub role: UserRole,
}

impl Principal {
    /// Create a new principal
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Check if the principal has admin privileges
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if the principal may act on identity decisions
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::from_str("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_str("Host"), Some(UserRole::Host));
        assert_eq!(UserRole::from_str("CUSTOMER"), Some(UserRole::Customer));
        assert_eq!(UserRole::from_str("owner"), None);
    }

    #[test]
    fn test_role_privileges() {
        assert!(UserRole::Admin.is_admin());
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Host.is_staff());
        assert!(!UserRole::Host.is_admin());
        assert!(!UserRole::Customer.is_staff());
    }

    #[test]
    fn test_principal() {
        let p = Principal::new(Uuid::new_v4(), UserRole::Customer);
        assert!(!p.is_admin());
        assert!(!p.is_staff());
    }
}
