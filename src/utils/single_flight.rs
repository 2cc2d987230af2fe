//! At-most-one-pending request slot
//!
//! Used to coalesce scroll events into a single animation frame: the first
//! request opens the slot, every request made while it is open merges into
//! it, and completing (or cancelling) the request closes it again.

/// State of a coalesced request carrying an optional host handle `T`
#[derive(Debug, PartialEq, Eq)]
pub enum SingleFlight<T> {
    Idle,
    /// Opened; the handle arrives once the host accepted the request
    Pending(Option<T>),
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        SingleFlight::Idle
    }
}

impl<T> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SingleFlight::Pending(_))
    }

    /// Open the slot. Returns false when a request is already in flight.
    pub fn try_begin(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = SingleFlight::Pending(None);
        true
    }

    /// Record the host handle of the open request
    pub fn set_handle(&mut self, handle: T) {
        if let SingleFlight::Pending(slot) = self {
            if slot.is_none() {
                *slot = Some(handle);
            }
        }
    }

    /// The request ran; close the slot
    pub fn complete(&mut self) {
        *self = SingleFlight::Idle;
    }

    /// Close the slot and hand back the handle so the host can cancel it
    pub fn cancel(&mut self) -> Option<T> {
        match std::mem::take(self) {
            SingleFlight::Pending(handle) => handle,
            SingleFlight::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_merge_while_pending() {
        let mut flight: SingleFlight<u32> = SingleFlight::new();
        assert!(flight.try_begin());
        assert!(!flight.try_begin());
        assert!(!flight.try_begin());
        flight.complete();
        assert!(flight.try_begin());
    }

    #[test]
    fn test_cancel_returns_handle() {
        let mut flight = SingleFlight::new();
        assert_eq!(flight.cancel(), None::<u32>);

        flight.try_begin();
        flight.set_handle(7);
        assert_eq!(flight.cancel(), Some(7));
        assert!(!flight.is_pending());
    }

    #[test]
    fn test_handle_ignored_when_idle() {
        let mut flight = SingleFlight::new();
        flight.set_handle(1);
        assert_eq!(flight, SingleFlight::Idle);
    }

    #[test]
    fn test_first_handle_wins() {
        let mut flight = SingleFlight::new();
        flight.try_begin();
        flight.set_handle(1);
        flight.set_handle(2);
        assert_eq!(flight.cancel(), Some(1));
    }
}
