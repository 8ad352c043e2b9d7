use std::net::{IpAddr, Ipv4Addr};

use pnet::ipnetwork::{Ipv4Network, Ipv6Network};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn len(&self) -> u64 {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        if end < start {
            0
        } else {
            u64::from(end - start) + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_iter(&self) -> impl Iterator<Item = IpAddr> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(|ip| IpAddr::V4(Ipv4Addr::from(ip)))
    }

    /// Usable host addresses: network and broadcast are dropped when the
    /// block holds more than two addresses.
    pub fn hosts(&self) -> impl Iterator<Item = IpAddr> {
        let strip = self.len() > 2;
        let total = self.len();
        self.to_iter()
            .enumerate()
            .filter(move |(idx, _)| !strip || (*idx != 0 && (*idx as u64) != total - 1))
            .map(|(_, ip)| ip)
    }
}

pub fn cidr_range(ip: Ipv4Addr, prefix: u8) -> anyhow::Result<Ipv4Range> {
    let network = Ipv4Network::new(ip, prefix)?;
    let start = network.network();
    let end = network.broadcast();

    Ok(Ipv4Range::new(start, end))
}

/// Host addresses of an IPv6 block. As with IPv4, the first and last
/// addresses are dropped when the block holds more than two. The iterator is
/// lazy since blocks are usually far larger than any scan limit.
pub fn ipv6_hosts(network: Ipv6Network) -> impl Iterator<Item = IpAddr> {
    let masked = Ipv6Network::new(network.network(), network.prefix()).unwrap_or(network);
    // `None` for a /0, whose last address is never reached anyway.
    let size: Option<u128> = 1u128.checked_shl(128 - u32::from(masked.prefix()));
    let (skip, take) = match size {
        Some(n) if n <= 2 => (0, usize::MAX),
        Some(n) => (1, usize::try_from(n - 2).unwrap_or(usize::MAX)),
        None => (1, usize::MAX),
    };
    masked.iter().skip(skip).take(take).map(IpAddr::V6)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn cidr_range_masks_host_bits() {
        let range = cidr_range(Ipv4Addr::new(10, 0, 0, 77), 24).unwrap();
        assert_eq!(range.start_addr, Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(range.end_addr, Ipv4Addr::new(10, 0, 0, 255));
        assert_eq!(range.len(), 256);
    }

    #[test]
    fn hosts_strip_network_and_broadcast() {
        let range = cidr_range(Ipv4Addr::new(192, 168, 1, 0), 30).unwrap();
        let hosts: Vec<IpAddr> = range.hosts().collect();
        assert_eq!(
            hosts,
            vec![
                IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)),
                IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2)),
            ]
        );
    }

    #[test]
    fn tiny_blocks_keep_every_address() {
        let slash31 = cidr_range(Ipv4Addr::new(192, 168, 1, 0), 31).unwrap();
        assert_eq!(slash31.hosts().count(), 2);

        let slash32 = cidr_range(Ipv4Addr::new(192, 168, 1, 9), 32).unwrap();
        assert_eq!(
            slash32.hosts().collect::<Vec<_>>(),
            vec![IpAddr::V4(Ipv4Addr::new(192, 168, 1, 9))]
        );
    }

    #[test]
    fn invalid_prefix_is_rejected() {
        assert!(cidr_range(Ipv4Addr::new(10, 0, 0, 0), 33).is_err());
    }

    fn v6_block(prefix: u8) -> Ipv6Network {
        Ipv6Network::new("2001:db8::".parse::<Ipv6Addr>().unwrap(), prefix).unwrap()
    }

    #[test]
    fn ipv6_hosts_strip_first_and_last() {
        let hosts: Vec<IpAddr> = ipv6_hosts(v6_block(126)).collect();
        assert_eq!(
            hosts,
            vec![
                "2001:db8::1".parse::<IpAddr>().unwrap(),
                "2001:db8::2".parse::<IpAddr>().unwrap(),
            ]
        );
        assert_eq!(ipv6_hosts(v6_block(120)).count(), 254);
    }

    #[test]
    fn tiny_ipv6_blocks_keep_every_address() {
        assert_eq!(ipv6_hosts(v6_block(127)).count(), 2);
        assert_eq!(ipv6_hosts(v6_block(128)).count(), 1);
    }

    #[test]
    fn huge_ipv6_block_starts_after_network_address() {
        let first: Vec<IpAddr> = ipv6_hosts(v6_block(32)).take(2).collect();
        assert_eq!(first[0], "2001:db8::1".parse::<IpAddr>().unwrap());
        assert_eq!(first[1], "2001:db8::2".parse::<IpAddr>().unwrap());
    }
}
