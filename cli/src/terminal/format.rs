use std::net::Ipv4Addr;
use std::time::Duration;

use colored::*;
use icmpgen_common::emission::SourceMode;

use crate::terminal::colors;

pub fn ipv4(addr: Ipv4Addr) -> ColoredString {
    addr.to_string().color(colors::IPV4_ADDR)
}

pub fn source_mode(mode: SourceMode) -> ColoredString {
    match mode {
        SourceMode::Local => "local interface".normal(),
        SourceMode::Randomized => "randomized".color(colors::ACCENT),
    }
}

pub fn interval(interval: Duration) -> ColoredString {
    if interval.is_zero() {
        return "none".normal();
    }
    format!("{}s", interval.as_secs()).normal()
}

pub fn yes_no(value: bool) -> ColoredString {
    if value {
        "yes".color(colors::PRIMARY)
    } else {
        "no".color(colors::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_reads_as_none() {
        assert!(interval(Duration::ZERO).to_string().contains("none"));
        assert!(interval(Duration::from_secs(5)).to_string().contains("5s"));
    }
}
