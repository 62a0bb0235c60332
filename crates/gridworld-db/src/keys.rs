//! Backend key composition.
//!
//! # Key Patterns
//!
//! | Pattern | Scope | Description |
//! |---------|-------|-------------|
//! | `global:ul` | global | Ordered participant list |
//! | `global:{id}##pos` | global | Position marker |
//! | `global:{id}##stats` | global | Statistics |
//! | `global:{id}##displayName` | global | Display name |
//! | `user:{id}##sp` | user | Unspent skill points |
//! | `user:{id}##inv` | user | Inventory |
//!
//! User-scoped keys are readable and writable only by the owning session;
//! global keys are readable by everyone.

use gridworld_types::UserId;

/// Literal key of the global participant list.
pub const PARTICIPANTS_KEY: &str = "global:ul";

/// Visibility scope of a stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Owned by one session.
    User,
    /// Shared by all participants.
    Global,
}

impl Scope {
    /// Key prefix for this scope.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Global => "global",
        }
    }
}

/// One independently-keyed field of a participant's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    /// [`PositionMarker`](gridworld_types::PositionMarker).
    Position,
    /// [`Stats`](gridworld_types::Stats).
    Stats,
    /// Inventory sequence.
    Inventory,
    /// Skill point counter.
    SkillPoints,
    /// Display name.
    DisplayName,
}

impl UserField {
    /// Field suffix used in the key.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Position => "pos",
            Self::Stats => "stats",
            Self::Inventory => "inv",
            Self::SkillPoints => "sp",
            Self::DisplayName => "displayName",
        }
    }

    /// The scope the field is stored under.
    ///
    /// Everything the public scene needs lives in the global scope; the
    /// owner-only counters stay user-scoped.
    pub const fn scope(self) -> Scope {
        match self {
            Self::Position | Self::Stats | Self::DisplayName => Scope::Global,
            Self::Inventory | Self::SkillPoints => Scope::User,
        }
    }

    /// Full backend key for `user_id`'s copy of this field.
    pub fn key(self, user_id: &UserId) -> String {
        format!("{}:{user_id}##{}", self.scope().prefix(), self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_by_scope_and_user() {
        let id = UserId::from("u_123");
        assert_eq!(UserField::Position.key(&id), "global:u_123##pos");
        assert_eq!(UserField::Stats.key(&id), "global:u_123##stats");
        assert_eq!(UserField::DisplayName.key(&id), "global:u_123##displayName");
        assert_eq!(UserField::SkillPoints.key(&id), "user:u_123##sp");
        assert_eq!(UserField::Inventory.key(&id), "user:u_123##inv");
    }

    #[test]
    fn different_users_never_share_a_key() {
        let a = UserId::from("u_1");
        let b = UserId::from("u_10");
        assert_ne!(UserField::Stats.key(&a), UserField::Stats.key(&b));
    }

    #[test]
    fn participant_list_lives_in_global_scope() {
        assert!(PARTICIPANTS_KEY.starts_with(Scope::Global.prefix()));
    }
}
