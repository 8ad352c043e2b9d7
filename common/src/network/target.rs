//! # Scan Target Model
//!
//! Turns user-entered target lists into the addresses that get probed.
//!
//! An entry is one of:
//! * A single IP address or hostname, probed as written.
//! * An IPv4 CIDR block (e.g. `104.16.0.0/24`), expanded to its hosts.
//! * An IPv6 CIDR block (e.g. `2606:4700::/120`), expanded lazily.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

use pnet::ipnetwork::Ipv6Network;
use tracing::warn;

use crate::error::TargetError;
use crate::network::range::{self, Ipv4Range};

/// Represents a distinct entry of a target list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// A literal address or hostname.
    Host { name: String },
    /// An IPv4 block, network and broadcast included.
    Range { ipv4_range: Ipv4Range },
    /// An IPv6 block.
    Block { ipv6_network: Ipv6Network },
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match parse_cidr(s)? {
            Some(target) => Ok(target),
            None => Ok(Target::Host {
                name: s.to_string(),
            }),
        }
    }
}

impl Target {
    /// Addresses this entry stands for, in ascending order.
    pub fn addresses(&self) -> Box<dyn Iterator<Item = String> + '_> {
        match self {
            Target::Host { name } => Box::new(std::iter::once(name.clone())),
            Target::Range { ipv4_range } => Box::new(ipv4_range.hosts().map(|ip| ip.to_string())),
            Target::Block { ipv6_network } => {
                Box::new(range::ipv6_hosts(*ipv6_network).map(|ip| ip.to_string()))
            }
        }
    }
}

/// Parses CIDR notation like "192.168.1.0/24" or "2001:db8::/64".
fn parse_cidr(s: &str) -> Result<Option<Target>, TargetError> {
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Ok(None);
    };

    let entry = || s.to_string();
    let addr = ip_str
        .trim()
        .parse::<IpAddr>()
        .map_err(|_| TargetError::InvalidAddress { entry: entry() })?;
    let prefix = prefix_str
        .trim()
        .parse::<u8>()
        .map_err(|_| TargetError::InvalidPrefix { entry: entry() })?;

    match addr {
        IpAddr::V4(ipv4_addr) => {
            let ipv4_range = range::cidr_range(ipv4_addr, prefix)
                .map_err(|_| TargetError::InvalidPrefix { entry: entry() })?;
            Ok(Some(Target::Range { ipv4_range }))
        }
        IpAddr::V6(ipv6_addr) => {
            let ipv6_network = ipv6_block(ipv6_addr, prefix)
                .ok_or_else(|| TargetError::InvalidPrefix { entry: entry() })?;
            Ok(Some(Target::Block { ipv6_network }))
        }
    }
}

fn ipv6_block(addr: Ipv6Addr, prefix: u8) -> Option<Ipv6Network> {
    let network = Ipv6Network::new(addr, prefix).ok()?;
    Ipv6Network::new(network.network(), prefix).ok()
}

/// Splits free-form input into target lines: trimmed, blank lines dropped,
/// duplicates removed while keeping the first occurrence in place.
pub fn normalize_lines(input: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    input
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}

/// Expands submitted entries into at most `limit` probe targets.
///
/// Entries may themselves span several lines. Blocks that fail to parse are
/// logged and skipped; the rest of the list is still expanded.
pub fn expand(entries: &[String], limit: usize) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();

    let lines = entries
        .iter()
        .flat_map(|entry| entry.split('\n'))
        .map(str::trim)
        .filter(|line| !line.is_empty());

    for line in lines {
        if expanded.len() >= limit {
            break;
        }
        match line.parse::<Target>() {
            Ok(target) => {
                let room = limit - expanded.len();
                expanded.extend(target.addresses().take(room));
            }
            Err(e) => warn!("Skipping target entry: {e}"),
        }
    }

    expanded
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
