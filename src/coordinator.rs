//! Acquisition coordinator (C3): a single-slot rendezvous used to synchronize
//! the foreground thread with asynchronous TDP callbacks.
//!
//! Each event the core awaits (tuner locked, one PSI section delivered)
//! resolves exactly once before the next is issued, so one mutex, one
//! condition variable and one sticky flag are enough — no general queue is
//! needed, and the single-filter invariant (§4.4) stays trivially true
//! because nothing here can buffer more than one pending signal.
//!
//! The flag is sticky so a `signal()` delivered before the matching
//! `wait_for_signal()` call is not lost, and timeouts are measured against an
//! absolute deadline so spurious wakeups can't extend a wait indefinitely
//! (§4.3, §9).

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::error::AcquisitionTimeout;

pub struct Coordinator {
    signaled: Mutex<bool>,
    condvar: Condvar,
}

impl Coordinator {
    pub fn new() -> Coordinator {
        Coordinator {
            signaled: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Acquire the mutex, set the flag, wake one waiter, release.
    pub fn signal(&self) {
        let mut signaled = self.signaled.lock().unwrap();
        *signaled = true;
        self.condvar.notify_one();
    }

    /// Block until `signal()` is called or `timeout` elapses, whichever comes
    /// first. Clears the flag on success.
    pub fn wait_for_signal(&self, timeout: Duration) -> Result<(), AcquisitionTimeout> {
        let deadline = Instant::now() + timeout;
        let mut signaled = self.signaled.lock().unwrap();

        loop {
            if *signaled {
                *signaled = false;
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(AcquisitionTimeout);
            }

            let (guard, timeout_result) =
                self.condvar.wait_timeout(signaled, deadline - now).unwrap();
            signaled = guard;

            if *signaled {
                *signaled = false;
                return Ok(());
            }
            if timeout_result.timed_out() {
                return Err(AcquisitionTimeout);
            }
            // Spurious wakeup with time left: loop and re-check the deadline.
        }
    }
}

impl Default for Coordinator {
    fn default() -> Coordinator {
        Coordinator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn signal_before_wait_is_not_lost() {
        let c = Coordinator::new();
        c.signal();
        assert!(c.wait_for_signal(Duration::from_millis(50)).is_ok());
    }

    #[test]
    fn times_out_without_signal() {
        let c = Coordinator::new();
        assert_eq!(
            c.wait_for_signal(Duration::from_millis(20)),
            Err(AcquisitionTimeout)
        );
    }

    #[test]
    fn signal_from_another_thread_wakes_waiter() {
        let c = Arc::new(Coordinator::new());
        let c2 = c.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            c2.signal();
        });
        assert!(c.wait_for_signal(Duration::from_secs(2)).is_ok());
        handle.join().unwrap();
    }

    #[test]
    fn flag_is_one_shot() {
        let c = Coordinator::new();
        c.signal();
        assert!(c.wait_for_signal(Duration::from_millis(10)).is_ok());
        assert_eq!(
            c.wait_for_signal(Duration::from_millis(10)),
            Err(AcquisitionTimeout)
        );
    }
}
