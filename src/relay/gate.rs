use super::UserId;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Global on/off switch for non-administrator traffic.
///
/// Administrators are always allowed through, whatever the flag says.
pub struct AvailabilityGate {
    active: AtomicBool,
    admins: HashSet<UserId>,
}

impl AvailabilityGate {
    /// Creates a gate with the given initial flag and administrator set
    #[must_use]
    pub const fn new(active: bool, admins: HashSet<UserId>) -> Self {
        Self {
            active: AtomicBool::new(active),
            admins,
        }
    }

    /// Returns `true` if requests from `user_id` are currently accepted
    ///
    /// # Examples
    ///
    /// ```
    /// use relay_translator::relay::AvailabilityGate;
    ///
    /// let gate = AvailabilityGate::new(false, [42].into_iter().collect());
    /// assert!(gate.allow(42));
    /// assert!(!gate.allow(7));
    /// ```
    #[must_use]
    pub fn allow(&self, user_id: UserId) -> bool {
        self.is_admin(user_id) || self.is_active()
    }

    /// Like [`Self::allow`], but logs the refusal of a `request` kind
    /// (`"text"`, `"voice"`)
    pub fn admit(&self, user_id: UserId, request: &str) -> bool {
        let allowed = self.allow(user_id);
        if !allowed {
            info!(user_id, request, "Request refused: bot is in maintenance");
        }
        allowed
    }

    /// Whether `user_id` is in the static administrator set
    #[must_use]
    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.admins.contains(&user_id)
    }

    /// Current value of the availability flag
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Sets the availability flag and returns the previous value
    pub fn set_active(&self, active: bool) -> bool {
        let previous = self.active.swap(active, Ordering::SeqCst);
        if previous != active {
            info!("Availability flag changed: {previous} -> {active}");
        }
        previous
    }
}
