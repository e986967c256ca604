use std::fmt;

/// Snapshot of a run, emitted after every attempt and once more at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub attempted: u32,
    pub succeeded: u32,
    pub total: u32,
    pub is_final: bool,
}

impl ProgressEvent {
    pub fn failed(&self) -> u32 {
        self.attempted - self.succeeded
    }

    /// True when a final event reports fewer attempts than requested.
    pub fn was_cancelled(&self) -> bool {
        self.is_final && self.attempted < self.total
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_final {
            write!(
                f,
                "Completed sending packets. Sent {} out of {} packets successfully.",
                self.succeeded, self.attempted
            )
        } else {
            write!(
                f,
                "Sent {} out of {} packets successfully.",
                self.succeeded, self.total
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_status_line() {
        let event = ProgressEvent { attempted: 2, succeeded: 1, total: 5, is_final: false };
        assert_eq!(event.to_string(), "Sent 1 out of 5 packets successfully.");
    }

    #[test]
    fn final_display_reports_attempted() {
        let event = ProgressEvent { attempted: 2, succeeded: 2, total: 5, is_final: true };
        assert_eq!(
            event.to_string(),
            "Completed sending packets. Sent 2 out of 2 packets successfully."
        );
        assert!(event.was_cancelled());
        assert_eq!(event.failed(), 0);
    }
}
