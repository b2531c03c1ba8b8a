use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delays used by the interaction controllers, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Processing pause between an accept click and the confirmed state
    pub accept_delay_ms: u64,
    pub reminder_ack_ms: u64,
    pub celebration_ms: u64,
    pub copy_ack_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            accept_delay_ms: 300,
            reminder_ack_ms: 3_000,
            celebration_ms: 2_000,
            copy_ack_ms: 2_000,
        }
    }
}

impl Timings {
    pub fn accept_delay(&self) -> Duration {
        Duration::from_millis(self.accept_delay_ms)
    }

    pub fn reminder_ack(&self) -> Duration {
        Duration::from_millis(self.reminder_ack_ms)
    }

    pub fn celebration(&self) -> Duration {
        Duration::from_millis(self.celebration_ms)
    }

    pub fn copy_ack(&self) -> Duration {
        Duration::from_millis(self.copy_ack_ms)
    }

    /// Acknowledgement windows must be visible for some time; the accept delay may be zero.
    pub fn validate(&self) -> CoreResult<()> {
        let windows = [
            ("reminder_ack_ms", self.reminder_ack_ms),
            ("celebration_ms", self.celebration_ms),
            ("copy_ack_ms", self.copy_ack_ms),
        ];

        for (name, value) in windows {
            if value == 0 {
                return Err(CoreError::InvalidConfig(format!("{} must be greater than zero", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let timings = Timings::default();
        assert_eq!(timings.accept_delay(), Duration::from_millis(300));
        assert_eq!(timings.reminder_ack(), Duration::from_secs(3));
        assert!(timings.validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let timings = Timings { copy_ack_ms: 0, ..Default::default() };
        assert!(matches!(timings.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let timings: Timings = serde_json::from_str(r#"{ "accept_delay_ms": 50 }"#).unwrap();
        assert_eq!(timings.accept_delay_ms, 50);
        assert_eq!(timings.reminder_ack_ms, 3_000);
    }
}
