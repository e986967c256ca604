use std::net::Ipv4Addr;

use icmpgen_common::config::Config;
use icmpgen_common::network::interface;
use tracing::warn;

use crate::terminal::{format, print};

/// Well known public address used only to pick a route.
const ROUTE_HINT: Ipv4Addr = Ipv4Addr::new(8, 8, 8, 8);

pub fn info(cfg: &Config) -> anyhow::Result<()> {
    let privileged: bool = is_root::is_root();

    print::header("local source", cfg.quiet);
    match interface::outbound_ipv4(ROUTE_HINT) {
        Ok(addr) => print::aligned_line("Outbound IPv4", format::ipv4(addr)),
        Err(e) => warn!("No outbound IPv4 address: {e:#}"),
    }
    print::aligned_line("Privileged", format::yes_no(privileged));

    if !privileged {
        warn!("Sending probes needs root privileges (or CAP_NET_RAW)");
    }
    Ok(())
}
