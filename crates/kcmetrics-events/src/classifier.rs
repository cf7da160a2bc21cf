//! Routing of user events to counting behaviors for per-type counters.

use kcmetrics_core::EventType;

/// How one user event turns into counter increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountingBehavior {
    /// `login.attempt` and `login`, tagged realm, provider and client id.
    Login,
    /// `login.attempt` and `login.error`, with the error-aware client id.
    LoginError,
    /// Per-type counter tagged realm, provider and client id.
    ProviderClient,
    /// Per-type counter tagged realm, provider, error-aware client id and error.
    ProviderClientError,
    /// Per-type counter tagged realm only.
    RealmOnly,
}

impl CountingBehavior {
    /// Total over every event type; anything without a dedicated behavior
    /// is counted per type with the realm tag.
    #[must_use]
    pub const fn of(event_type: EventType) -> Self {
        match event_type {
            EventType::Login => CountingBehavior::Login,
            EventType::LoginError => CountingBehavior::LoginError,
            EventType::ClientLogin
            | EventType::Register
            | EventType::RefreshToken
            | EventType::CodeToToken => CountingBehavior::ProviderClient,
            EventType::ClientLoginError
            | EventType::RegisterError
            | EventType::RefreshTokenError
            | EventType::CodeToTokenError => CountingBehavior::ProviderClientError,
            _ => CountingBehavior::RealmOnly,
        }
    }
}
