//! Shared types used by the tracker subsystem.

use std::fmt;

use corelib::models::Token;
use tokio::sync::mpsc::Sender;

/// A job sent from the tracker to whatever delivers announcements.
///
/// This represents: "a follow-up price update should go out for this
/// token". Rendering and delivery are the receiver's concern.
#[derive(Clone)]
pub struct UpdateNotification {
    pub token: Token,
    pub price_usd: f64,
    pub market_cap_usd: f64,
    pub price_multiplier: f64,
    pub market_cap_multiplier: f64,
    /// 1-based ordinal of this update for the token.
    pub update_number: u64,
    /// Aggregate decision reason, for operator-facing logs.
    pub reason: String,
}

impl fmt::Debug for UpdateNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateNotification")
            .field("token", &self.token.id())
            .field("price_usd", &self.price_usd)
            .field("price_multiplier", &self.price_multiplier)
            .field("update_number", &self.update_number)
            .finish()
    }
}

/// Convenience alias for the notification queue type.
pub type NotifySender = Sender<UpdateNotification>;
