use std::time::{Duration, Instant};

/// How long Enter is swallowed after an automatic double newline.
pub const NEWLINE_GUARD_DELAY: Duration = Duration::from_millis(300);

/// Debounce for automatic newline insertion. Only one guard is ever pending;
/// re-arming replaces the previous expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewlineGuard {
    armed_until: Option<Instant>,
}

impl NewlineGuard {
    pub fn arm(&mut self, now: Instant) {
        self.armed_until = Some(now + NEWLINE_GUARD_DELAY);
    }

    /// Any other keystroke ends the debounce window early.
    pub fn disarm(&mut self) {
        self.armed_until = None;
    }

    pub fn is_armed(&self, now: Instant) -> bool {
        self.armed_until.is_some_and(|until| now < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_delay() {
        let t0 = Instant::now();
        let mut guard = NewlineGuard::default();
        assert!(!guard.is_armed(t0));
        guard.arm(t0);
        assert!(guard.is_armed(t0));
        assert!(guard.is_armed(t0 + Duration::from_millis(299)));
        assert!(!guard.is_armed(t0 + NEWLINE_GUARD_DELAY));
    }

    #[test]
    fn disarm_clears_pending_expiry() {
        let t0 = Instant::now();
        let mut guard = NewlineGuard::default();
        guard.arm(t0);
        guard.disarm();
        assert!(!guard.is_armed(t0));
        guard.disarm();
        assert_eq!(guard, NewlineGuard::default());
    }

    #[test]
    fn rearm_extends() {
        let t0 = Instant::now();
        let mut guard = NewlineGuard::default();
        guard.arm(t0);
        guard.arm(t0 + Duration::from_millis(200));
        assert!(guard.is_armed(t0 + Duration::from_millis(400)));
    }
}
