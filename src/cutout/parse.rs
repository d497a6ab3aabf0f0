use ipnetwork::{IpNetwork, IpNetworkError};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{input:?} is not a valid CIDR network: {source}")]
pub struct ParseError {
  pub input: String,
  pub source: IpNetworkError,
}

/// Parse a CIDR string, zeroing any host bits set past the prefix.
///
/// Parsing is non-strict: `10.1.9.32/16` becomes `10.1.0.0/16` instead of
/// being rejected. A bare address with no `/prefix` is read as a full-width
/// network. The prefix length must fit the address family.
pub fn parse_network(input: &str) -> Result<IpNetwork, ParseError> {
  let parsed: IpNetwork = input.parse().map_err(|source| ParseError {
    input: input.to_owned(),
    source,
  })?;

  let aligned = IpNetwork::new(parsed.network(), parsed.prefix()).map_err(|source| ParseError {
    input: input.to_owned(),
    source,
  })?;

  Ok(aligned)
}
