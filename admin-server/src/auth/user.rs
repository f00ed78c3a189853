//! Request-scoped user context
//!
//! Built by the authentication middleware from the validated token plus a
//! fresh store lookup, then threaded to handlers via request extensions.

/// The authenticated user for the current request
///
/// Holds the identity from the token and the roles/effective permission
/// set loaded from the store for this request. Grant changes therefore
/// apply from the very next request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User ID
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Names of assigned roles
    pub roles: Vec<String>,
    /// Effective permission set: direct grants plus role grants
    pub permissions: Vec<String>,
    /// Whether one of the assigned roles is the reserved role
    pub reserved: bool,
}

impl CurrentUser {
    /// Whether this user holds the reserved role (every check passes)
    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    /// Check membership of a role by name
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check a permission against the effective set
    ///
    /// The reserved role short-circuits to true regardless of grants.
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.reserved {
            return true;
        }
        self.permissions.iter().any(|p| p == permission)
    }

    /// Check whether any of the given permissions is held
    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        if self.reserved {
            return true;
        }
        permissions.iter().any(|p| self.has_permission(p))
    }

    /// Check whether any entry matches a held role or permission
    pub fn has_any_role_or_permission(&self, items: &[&str]) -> bool {
        if self.reserved {
            return true;
        }
        items
            .iter()
            .any(|item| self.has_role(item) || self.has_permission(item))
    }
}
