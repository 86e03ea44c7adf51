//! Player-facing messages and the sink that delivers them.
//!
//! The crate only knows message keys and their English defaults. Hosts with
//! a real localization catalog implement [`NotificationSink`] and look the
//! key up themselves.

use std::fmt;

use tracing::info;

use crate::types::ActorId;

/// Keys of every message the gate can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Sent to an actor whose mount was refused.
    CannotMountVehicle,
}

impl MessageKey {
    /// All keys, for catalog registration.
    pub const ALL: &'static [MessageKey] = &[MessageKey::CannotMountVehicle];

    /// Catalog key string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CannotMountVehicle => "CannotMountVehicle",
        }
    }

    /// English default text.
    pub fn default_text(self) -> &'static str {
        match self {
            Self::CannotMountVehicle => {
                "You cannot mount this vehicle as it already has an occupant."
            }
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substitute positional placeholders `{0}`, `{1}`, ... in `template`.
///
/// Placeholders without a matching argument are left as written.
pub fn format_message(template: &str, args: &[String]) -> String {
    if args.is_empty() {
        return template.to_owned();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let (before, from_brace) = rest.split_at(open);
        out.push_str(before);

        let substituted = from_brace.find('}').and_then(|close| {
            let digits = from_brace.get(1..close)?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let index: usize = digits.parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });

        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = from_brace.get(close.saturating_add(1)..).unwrap_or("");
            }
            None => {
                out.push('{');
                rest = from_brace.get(1..).unwrap_or("");
            }
        }
    }
    out.push_str(rest);
    out
}

/// Failure to deliver a message.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The recipient is no longer reachable (e.g. disconnected).
    #[error("actor {0} is not connected")]
    Unreachable(ActorId),

    /// Any other delivery failure.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Delivers a message to an actor.
pub trait NotificationSink: Send + Sync {
    /// Send `key` (formatted with `args`) to `actor`.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] if delivery fails. Callers treat this as
    /// non-fatal.
    fn send(&self, actor: ActorId, key: MessageKey, args: &[String]) -> Result<(), NotifyError>;
}

/// Sink that renders the English default and writes it to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn send(&self, actor: ActorId, key: MessageKey, args: &[String]) -> Result<(), NotifyError> {
        let message = format_message(key.default_text(), args);
        info!(%actor, key = %key, message = %message, "notify actor");
        Ok(())
    }
}
