//! Session types: what the client currently believes about the user.
//!
//! A [`Session`] is never stored. It's rederived from the credential on
//! every start, and it changes only through [`Session::next`], driven by
//! a [`SessionEvent`].

use std::time::Duration;

use eventhub_protocol::{Claims, Role, SubjectId};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How often a background task should re-check an active session's
    /// expiry. `None` or a zero duration disables the background check;
    /// expiry is then only looked at during bootstrap and explicit
    /// [`check_expiry`](crate::SessionManager::check_expiry) calls.
    ///
    /// Default: 60 seconds.
    pub expiry_check_interval: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expiry_check_interval: Some(Duration::from_secs(60)),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The client's current belief about who is logged in.
///
/// ```text
///                 ┌──(bootstrap: valid token)──→ Active ←─(login)─┐
///   Pending ──────┤                                │     │        │
///                 └──(bootstrap: none/bad/expired)─┼─→ Anonymous ─┘
///                                                  │        ↑
///                                      (logout / expired)───┘
/// ```
///
/// - **Pending**: start-up, before the store has been consulted.
///   Consumers should render a loading state, not a login prompt.
/// - **Anonymous**: no usable credential.
/// - **Active**: a credential decoded to this subject and role.
///
/// The role is for deciding what to show. It was read from an unverified
/// token; the server enforces the real permissions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Pending,
    Anonymous,
    Active { subject: SubjectId, role: Role },
}

impl Session {
    /// Returns `true` until bootstrap has run.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` for an authenticated session.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// The logged-in subject, if any.
    pub fn subject(&self) -> Option<SubjectId> {
        match self {
            Self::Active { subject, .. } => Some(*subject),
            _ => None,
        }
    }

    /// The logged-in user's role, if any.
    pub fn role(&self) -> Option<&Role> {
        match self {
            Self::Active { role, .. } => Some(role),
            _ => None,
        }
    }

    /// Returns `true` if the user is an organizer who owns a resource
    /// created by `owner`, e.g. an event they may edit.
    pub fn can_manage(&self, owner: SubjectId) -> bool {
        match self {
            Self::Active { subject, role } => {
                role.is_organizer() && *subject == owner
            }
            _ => false,
        }
    }

    /// Returns `true` if the user may reserve tickets.
    pub fn can_reserve(&self) -> bool {
        matches!(
            self,
            Self::Active {
                role: Role::Participant,
                ..
            }
        )
    }

    /// Computes the session that follows `event`.
    ///
    /// This is a pure function: it doesn't touch the store or publish
    /// anything. [`SessionManager`](crate::SessionManager) calls it from
    /// its single mutation point.
    ///
    /// Every event is accepted from every state. A re-run of bootstrap
    /// or a second login simply replaces whatever identity was there.
    pub fn next(&self, event: &SessionEvent) -> Session {
        match event {
            SessionEvent::Restored(claims)
            | SessionEvent::Authenticated(claims) => Self::from_claims(claims),
            SessionEvent::Invalidated | SessionEvent::LoggedOut => {
                Self::Anonymous
            }
        }
    }

    fn from_claims(claims: &Claims) -> Self {
        Self::Active {
            subject: claims.subject(),
            role: claims.role().clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// Something that happened to the credential.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Bootstrap found a valid, unexpired stored credential.
    Restored(Claims),

    /// A login returned a valid credential.
    Authenticated(Claims),

    /// The stored credential is missing, undecodable, or expired.
    Invalidated,

    /// The user logged out.
    LoggedOut,
}
