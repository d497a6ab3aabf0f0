use std::net::IpAddr;

use ipnetwork::IpNetwork;
use num_bigint::{BigInt, Sign};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SplitError {
  #[error("networks {0} and {1} have different address types")]
  FamilyMismatch(IpNetwork, IpNetwork),

  #[error("network {0} cannot be split any further")]
  PrefixExhausted(IpNetwork),
}

/// Whether `inner` lies entirely within `outer`.
///
/// Containment requires `inner` to be at least as narrow as `outer` and its
/// base address to fall inside `outer`'s range. Comparing networks of
/// different address families is an error, not `false`.
pub fn contains_network(outer: &IpNetwork, inner: &IpNetwork) -> Result<bool, SplitError> {
  match (outer, inner) {
    (IpNetwork::V4(_), IpNetwork::V4(_)) | (IpNetwork::V6(_), IpNetwork::V6(_)) => {
      Ok(inner.prefix() >= outer.prefix() && outer.contains(inner.network()))
    }
    _ => Err(SplitError::FamilyMismatch(*outer, *inner)),
  }
}

/// Carve `excluded` out of `block`, returning the blocks that remain.
///
/// Bisects `block` one prefix bit at a time, keeping the half that does not
/// contain `excluded` and descending into the half that does, until the
/// containing half equals `excluded` itself. That final half is discarded.
/// Each kept half is maximal: merging it with its sibling would put the
/// excluded range back.
///
/// `excluded` must already be known to be contained in `block`; callers
/// check with [`contains_network`] first.
pub fn split_around(block: IpNetwork, excluded: IpNetwork) -> Result<Vec<IpNetwork>, SplitError> {
  let mut kept = Vec::new();
  let mut current = block;

  while current.prefix() < excluded.prefix() {
    let (lower, upper) = bisect(current)?;

    if contains_network(&lower, &excluded)? {
      kept.push(upper);
      current = lower;
    } else {
      kept.push(lower);
      current = upper;
    }
  }

  Ok(kept)
}

/// Split a network into its two equal halves, one prefix bit longer.
fn bisect(network: IpNetwork) -> Result<(IpNetwork, IpNetwork), SplitError> {
  let width = address_width(&network);
  if network.prefix() >= width {
    return Err(SplitError::PrefixExhausted(network));
  }

  let prefix = network.prefix() + 1;
  let upper_base = offset_ip(network.network(), (width - prefix) as usize);

  // UNWRAP: panics on invalid prefix, but it was checked against the width
  let lower = IpNetwork::new(network.network(), prefix).unwrap();
  let upper = IpNetwork::new(upper_base, prefix).unwrap();

  Ok((lower, upper))
}

fn address_width(network: &IpNetwork) -> u8 {
  match network {
    IpNetwork::V4(_) => 32,
    IpNetwork::V6(_) => 128,
  }
}

/// The address `2^bits` above `ip`.
fn offset_ip(ip: IpAddr, bits: usize) -> IpAddr {
  match ip {
    IpAddr::V4(ip) => {
      let bi: BigInt = BigInt::from_bytes_be(Sign::Plus, &ip.octets()) + (BigInt::from(1u8) << bits);
      let mut octets = [0u8; 4];
      let (_, bytes) = bi.to_bytes_be();
      octets[4 - bytes.len()..].copy_from_slice(&bytes);
      IpAddr::from(octets)
    }

    IpAddr::V6(ip) => {
      let bi: BigInt = BigInt::from_bytes_be(Sign::Plus, &ip.octets()) + (BigInt::from(1u8) << bits);
      let mut octets = [0u8; 16];
      let (_, bytes) = bi.to_bytes_be();
      octets[16 - bytes.len()..].copy_from_slice(&bytes);
      IpAddr::from(octets)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bisect_v4() {
    let halves = bisect("10.0.0.0/8".parse().unwrap()).unwrap();

    assert_eq!(halves.0, "10.0.0.0/9".parse().unwrap());
    assert_eq!(halves.1, "10.128.0.0/9".parse().unwrap());
  }

  #[test]
  fn bisect_v4_narrow() {
    let halves = bisect("192.168.2.0/23".parse().unwrap()).unwrap();

    assert_eq!(halves.0, "192.168.2.0/24".parse().unwrap());
    assert_eq!(halves.1, "192.168.3.0/24".parse().unwrap());
  }

  #[test]
  fn bisect_v6() {
    let halves = bisect("2001:db8::/32".parse().unwrap()).unwrap();

    assert_eq!(halves.0, "2001:db8::/33".parse().unwrap());
    assert_eq!(halves.1, "2001:db8:8000::/33".parse().unwrap());
  }

  #[test]
  fn bisect_full_prefix() {
    let network = "10.0.0.1/32".parse().unwrap();
    assert_eq!(bisect(network), Err(SplitError::PrefixExhausted(network)));

    let network = "2001:db8::1/128".parse().unwrap();
    assert_eq!(bisect(network), Err(SplitError::PrefixExhausted(network)));
  }

  #[test]
  fn contains_subnet() {
    let outer = "10.0.0.0/8".parse().unwrap();

    assert_eq!(
      contains_network(&outer, &"10.1.0.0/16".parse().unwrap()),
      Ok(true)
    );
    assert_eq!(contains_network(&outer, &outer), Ok(true));
  }

  #[test]
  fn contains_disjoint() {
    let outer = "10.0.0.0/8".parse().unwrap();

    assert_eq!(
      contains_network(&outer, &"192.168.0.0/16".parse().unwrap()),
      Ok(false)
    );
  }

  #[test]
  fn contains_wider_network() {
    // a wider network is never contained, even though the ranges overlap
    let outer = "10.0.0.0/9".parse().unwrap();

    assert_eq!(
      contains_network(&outer, &"10.0.0.0/8".parse().unwrap()),
      Ok(false)
    );
  }

  #[test]
  fn contains_family_mismatch() {
    let outer = "10.0.0.0/8".parse().unwrap();
    let inner = "2001:db8::/32".parse().unwrap();

    assert_eq!(
      contains_network(&outer, &inner),
      Err(SplitError::FamilyMismatch(outer, inner))
    );
  }

  #[test]
  fn split_around_equal_block() {
    let block = "10.0.0.0/8".parse().unwrap();

    assert_eq!(split_around(block, block), Ok(vec![]));
  }

  #[test]
  fn split_around_one_level() {
    let block = "10.0.0.0/8".parse().unwrap();
    let kept = split_around(block, "10.128.0.0/9".parse().unwrap()).unwrap();

    assert_eq!(kept, vec!["10.0.0.0/9".parse().unwrap()]);
  }

  #[test]
  fn split_around_two_levels() {
    let block = "10.0.0.0/24".parse().unwrap();
    let kept = split_around(block, "10.0.0.64/26".parse().unwrap()).unwrap();

    assert_eq!(
      kept,
      vec![
        "10.0.0.128/25".parse().unwrap(),
        "10.0.0.0/26".parse().unwrap(),
      ]
    );
  }

  #[test]
  fn split_around_v6() {
    let block = "2001:db8::/32".parse().unwrap();
    let kept = split_around(block, "2001:db8::/33".parse().unwrap()).unwrap();

    assert_eq!(kept, vec!["2001:db8:8000::/33".parse().unwrap()]);
  }
}
