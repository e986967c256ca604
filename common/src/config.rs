use crate::error::ValidationError;

/// Largest ICMP payload that still fits a 1500 byte MTU with a 20 byte IPv4
/// header and the 8 byte echo header.
pub const MAX_PAYLOAD_LEN: usize = 1472;
pub const DEFAULT_TTL: u8 = 64;

pub struct Config {
    /// Reduces terminal output. 1 hides headers, 2 also hides the progress bar.
    pub quiet: u8,
    /// Disables the keyboard listener ('q' to stop).
    ///
    /// Ctrl-C still stops the run through the signal handler.
    pub disable_input: bool,
}

/// On-wire settings handed to the transmitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    pub ttl: u8,
    pub payload_len: usize,
    /// ICMP identifier stamped on every probe of a run.
    pub identifier: u16,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            payload_len: 0,
            identifier: rand::random(),
        }
    }
}

impl ProbeConfig {
    pub fn with_ttl(mut self, ttl: u8) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_payload_len(mut self, payload_len: usize) -> Result<Self, ValidationError> {
        if payload_len > MAX_PAYLOAD_LEN {
            return Err(ValidationError::PayloadTooLarge {
                max: MAX_PAYLOAD_LEN,
                got: payload_len,
            });
        }
        self.payload_len = payload_len;
        Ok(self)
    }

    pub fn with_identifier(mut self, identifier: u16) -> Self {
        self.identifier = identifier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_probe_config_uses_standard_ttl() {
        let cfg = ProbeConfig::default();
        assert_eq!(cfg.ttl, DEFAULT_TTL);
        assert_eq!(cfg.payload_len, 0);
    }

    #[test]
    fn payload_len_is_bounded_by_mtu() {
        let ok = ProbeConfig::default().with_payload_len(MAX_PAYLOAD_LEN);
        assert!(ok.is_ok());

        let too_big = ProbeConfig::default().with_payload_len(MAX_PAYLOAD_LEN + 1);
        assert_eq!(
            too_big.unwrap_err(),
            ValidationError::PayloadTooLarge {
                max: MAX_PAYLOAD_LEN,
                got: MAX_PAYLOAD_LEN + 1
            }
        );
    }
}
