// ── Operator session ──
//
// Role is produced by the portal login (an external collaborator) and
// consumed read-only here. There is no write path: login/logout are the
// caller's concern, and a new role means constructing a new gate.

use serde::{Deserialize, Serialize};

/// Operator role, as reported by the portal login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Role {
    Admin,
    /// Any role string other than `"admin"` — read-only access.
    #[default]
    Observer,
}

impl Role {
    /// Map the portal's role string. Only the exact string `"admin"`
    /// grants mutation rights.
    pub fn from_portal(role: &str) -> Self {
        if role == "admin" {
            Self::Admin
        } else {
            Self::Observer
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Read-only holder of the operator role.
///
/// Mutation entry points re-check this gate unconditionally — a disabled
/// UI affordance is never trusted as the authority.
#[derive(Debug, Clone, Copy)]
pub struct SessionGate {
    role: Role,
}

impl SessionGate {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    /// Gate for anonymous/read-only use (list and watch still work).
    pub fn observer() -> Self {
        Self {
            role: Role::Observer,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn can_mutate(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_admin_string_grants_mutation() {
        assert!(Role::from_portal("admin").is_admin());
        assert!(!Role::from_portal("Admin").is_admin());
        assert!(!Role::from_portal("viewer").is_admin());
        assert!(!Role::from_portal("").is_admin());
    }

    #[test]
    fn observer_gate_cannot_mutate() {
        assert!(!SessionGate::observer().can_mutate());
        assert!(SessionGate::new(Role::Admin).can_mutate());
    }
}
