// ── Authorization policy ──
//
// One function decides what a caller may do. The caller identity is
// always passed in explicitly; nothing here reads ambient state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::Scope;

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum Caller {
    Admin,
    /// A video consumer computing footprints.
    Consumer(String),
    /// A content provider choosing servers.
    Provider(String),
}

impl Caller {
    /// Identifier recorded in history.
    pub fn id(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Consumer(id) | Self::Provider(id) => id,
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Consumer(id) => write!(f, "consumer:{id}"),
            Self::Provider(id) => write!(f, "provider:{id}"),
        }
    }
}

/// Operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[strum(serialize = "compute footprints")]
    ComputeFootprint,
    #[strum(serialize = "view history")]
    ViewHistory,
    #[strum(serialize = "clear history")]
    ClearHistory,
    #[strum(serialize = "read footprint statistics")]
    FootprintStats,
    #[strum(serialize = "list servers")]
    ListServers,
    #[strum(serialize = "list eligible servers")]
    EligibleServers,
    #[strum(serialize = "rank servers")]
    RankServers,
}

/// Decide whether `caller` may perform `action`, and over which scope.
pub fn authorize(caller: &Caller, action: Action) -> Result<Scope, CoreError> {
    let scope = match (caller, action) {
        (
            Caller::Consumer(id),
            Action::ComputeFootprint
            | Action::ViewHistory
            | Action::ClearHistory
            | Action::FootprintStats,
        )
        | (
            Caller::Provider(id),
            Action::ListServers | Action::EligibleServers | Action::RankServers,
        ) => Some(Scope::Caller(id.clone())),
        (
            Caller::Admin,
            Action::ViewHistory | Action::ClearHistory | Action::FootprintStats | Action::ListServers,
        ) => Some(Scope::All),
        _ => None,
    };
    scope.ok_or_else(|| CoreError::Forbidden {
        caller: caller.to_string(),
        action: action.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn consumer() -> Caller {
        Caller::Consumer("alice".into())
    }

    fn provider() -> Caller {
        Caller::Provider("acme".into())
    }

    #[test]
    fn consumer_sees_only_own_history() {
        assert_eq!(
            authorize(&consumer(), Action::ViewHistory).unwrap(),
            Scope::Caller("alice".into())
        );
        assert!(authorize(&consumer(), Action::ComputeFootprint).is_ok());
    }

    #[test]
    fn admin_sees_everything_but_cannot_compute() {
        assert_eq!(authorize(&Caller::Admin, Action::ClearHistory).unwrap(), Scope::All);
        assert_eq!(authorize(&Caller::Admin, Action::ListServers).unwrap(), Scope::All);
        assert!(matches!(
            authorize(&Caller::Admin, Action::ComputeFootprint),
            Err(CoreError::Forbidden { .. })
        ));
    }

    #[test]
    fn provider_ranks_but_has_no_history() {
        assert!(authorize(&provider(), Action::RankServers).is_ok());
        assert!(authorize(&provider(), Action::EligibleServers).is_ok());
        assert!(authorize(&provider(), Action::ViewHistory).is_err());
        assert!(authorize(&provider(), Action::ComputeFootprint).is_err());
    }

    #[test]
    fn consumer_cannot_rank() {
        let err = authorize(&consumer(), Action::RankServers).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Caller 'consumer:alice' is not allowed to rank servers"
        );
    }
}
