//! Candidate length and retry budget for slug allocation.

/// Shortest slug the store schema accepts.
pub const MIN_SLUG_LENGTH: usize = 4;

/// Longest slug the store schema accepts (`VARCHAR(10)`).
pub const MAX_SLUG_LENGTH: usize = 10;

/// Controls how the allocator picks candidate lengths and when it gives up.
///
/// The default reproduces escalate-on-first-collision: the first candidate is
/// six characters, and every candidate after any collision is seven. Raising
/// `attempts_before_escalation` keeps retrying at the initial length for that
/// many collisions first.
///
/// At 62^6 possible slugs an organic collision is rare, so hitting
/// `max_attempts` means something is broken (a stuck generator, a store that
/// rejects everything) rather than that the keyspace is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationPolicy {
    pub initial_length: usize,
    pub escalated_length: usize,
    /// Collisions tolerated at `initial_length` before switching lengths.
    pub attempts_before_escalation: u32,
    /// Total candidates tried before allocation fails.
    pub max_attempts: u32,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            initial_length: 6,
            escalated_length: 7,
            attempts_before_escalation: 1,
            max_attempts: 100,
        }
    }
}

impl AllocationPolicy {
    /// Returns the candidate length to use after `collisions` failed candidates.
    pub fn length_for(&self, collisions: u32) -> usize {
        if collisions < self.attempts_before_escalation {
            self.initial_length
        } else {
            self.escalated_length
        }
    }

    /// Checks that the policy can produce slugs the store accepts.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated rule.
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_SLUG_LENGTH..=MAX_SLUG_LENGTH).contains(&self.initial_length) {
            return Err(format!(
                "initial slug length must be between {} and {}, got {}",
                MIN_SLUG_LENGTH, MAX_SLUG_LENGTH, self.initial_length
            ));
        }

        if self.escalated_length < self.initial_length || self.escalated_length > MAX_SLUG_LENGTH {
            return Err(format!(
                "escalated slug length must be between {} and {}, got {}",
                self.initial_length, MAX_SLUG_LENGTH, self.escalated_length
            ));
        }

        if self.max_attempts == 0 {
            return Err("max allocation attempts must be at least 1".to_string());
        }

        Ok(())
    }
}
