use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Roles handed to us by the external identity provider. The platform trusts
/// the provider; these only drive authorization, never authentication.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Player,
    Owner,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "PLAYER",
            Role::Owner => "OWNER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PLAYER" => Some(Role::Player),
            "OWNER" => Some(Role::Owner),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// The caller identity attached to every operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: String,
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The caller owns the given resource, or is an admin.
    pub fn owns(&self, owner_id: &str) -> bool {
        self.is_admin() || self.user_id == owner_id
    }

    pub fn require_owner_of(&self, owner_id: &str, what: &str) -> CoreResult<()> {
        if self.owns(owner_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Caller {} does not own {}",
                self.user_id, what
            )))
        }
    }

    pub fn require_admin(&self, action: &str) -> CoreResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!("{} requires an admin", action)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ownership_checks() {
        let owner = AuthContext::new("owner-1", Role::Owner);
        let admin = AuthContext::new("admin-1", Role::Admin);
        let stranger = AuthContext::new("owner-2", Role::Owner);

        assert!(owner.require_owner_of("owner-1", "turf").is_ok());
        assert!(admin.require_owner_of("owner-1", "turf").is_ok());
        assert!(matches!(
            stranger.require_owner_of("owner-1", "turf"),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn test_role_parse_round_trip() {
        for role in [Role::Player, Role::Owner, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("SUPER_ADMIN"), None);
    }
}
