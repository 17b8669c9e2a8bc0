//! Connection state machine.

/// Lifecycle events that move the connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Connection established.
    Open,
    /// Transport error reported.
    Error,
    /// Connection closed; a retry gets scheduled.
    Close,
    /// Scheduled retry started a new attempt.
    Retry,
}

/// State of the feed connection, as shown by the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Connecting,
    Connected,
    Error,
    Reconnecting,
}

impl ConnectionState {
    /// Apply a lifecycle event.
    ///
    /// The next state depends only on the event.
    pub fn on(self, event: Lifecycle) -> Self {
        match event {
            Lifecycle::Open => ConnectionState::Connected,
            Lifecycle::Error => ConnectionState::Error,
            Lifecycle::Close => ConnectionState::Reconnecting,
            Lifecycle::Retry => ConnectionState::Connecting,
        }
    }

    /// Status indicator text.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Connected => "Connected",
            ConnectionState::Error => "Error",
            ConnectionState::Reconnecting => "Reconnecting...",
        }
    }

    pub fn is_connected(&self) -> bool {
        *self == ConnectionState::Connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_connecting() {
        assert_eq!(ConnectionState::default(), ConnectionState::Connecting);
    }

    #[test]
    fn failed_attempt_cycle() {
        let state = ConnectionState::Connecting
            .on(Lifecycle::Error)
            .on(Lifecycle::Close);
        assert_eq!(state, ConnectionState::Reconnecting);
        assert_eq!(state.on(Lifecycle::Retry), ConnectionState::Connecting);
    }

    #[test]
    fn open_then_close() {
        let state = ConnectionState::Connecting.on(Lifecycle::Open);
        assert!(state.is_connected());
        assert_eq!(state.on(Lifecycle::Close), ConnectionState::Reconnecting);
    }

    #[test]
    fn labels_match_indicator_text() {
        assert_eq!(ConnectionState::Connecting.label(), "Connecting...");
        assert_eq!(ConnectionState::Connected.label(), "Connected");
        assert_eq!(ConnectionState::Error.label(), "Error");
        assert_eq!(ConnectionState::Reconnecting.label(), "Reconnecting...");
    }
}
