use tracing::Level;

/// Category of a diagnostic event emitted by the driver
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEventType {
    ConnectionOpened = 1,
    ConnectionClosed = 2,
    QueryOpened = 3,
    ResultOpened = 4,
    ResultClosed = 5,
    QueryClosed = 6,
    StatementPrepared = 7,
    StatementExecuted = 8,
    StatementClosed = 9,
    NonQuery = 10,
    UsageAdvisorWarning = 11,
    Warning = 12,
    Error = 13,
    QueryNormalized = 14,
}

impl TraceEventType {
    pub fn level(&self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warning | Self::UsageAdvisorWarning => Level::WARN,
            _ => Level::DEBUG,
        }
    }
}

/// Emit a driver event through `tracing`
///
/// `driver_id` is the server thread id of the connection, or -1 when there is none.
pub fn trace_event(kind: TraceEventType, driver_id: i64, message: &str) {
    match kind {
        TraceEventType::Error => tracing::error!(event = ?kind, driver_id, "{message}"),
        TraceEventType::Warning | TraceEventType::UsageAdvisorWarning => {
            tracing::warn!(event = ?kind, driver_id, "{message}")
        }
        _ => tracing::debug!(event = ?kind, driver_id, "{message}"),
    }
}
