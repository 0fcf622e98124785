//! Single pending timeout owned by a client monitor

/// One-shot timer slot.
///
/// Arming replaces whatever was pending; there is never more than one
/// outstanding timeout per slot. The host is responsible for calling back into
/// the owning monitor when the timeout elapses.
pub trait IdleTimer {
    /// Schedule the timeout `delay_ms` from now, dropping any pending one
    fn arm(&mut self, delay_ms: i64);

    /// Drop the pending timeout, if any
    fn cancel(&mut self);
}
