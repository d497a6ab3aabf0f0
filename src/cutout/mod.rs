pub mod parse;
pub mod split;

use ipnetwork::IpNetwork;
use tracing::debug;

pub use parse::{parse_network, ParseError};
use split::{contains_network, split_around, SplitError};

/// Subtract `exclusions` from `base`, returning the maximal disjoint CIDR
/// blocks that cover everything in `base` not claimed by an exclusion.
///
/// Exclusions are applied one at a time against every block still standing.
/// An exclusion only takes effect on a block that fully contains it; a
/// disjoint or wider exclusion leaves the block untouched, as does any
/// block/exclusion pair the splitter refuses (a mixed address family, for
/// instance). Both inputs are expected to be prefix-aligned, which
/// [`parse_network`] guarantees.
///
/// The result is sorted by base address, narrower blocks after wider ones at
/// the same address, and does not depend on the order of `exclusions`.
pub fn compute_cutouts(base: IpNetwork, exclusions: &[IpNetwork]) -> Vec<IpNetwork> {
  let mut frontier = vec![base];

  for excluded in exclusions {
    let mut remaining = Vec::with_capacity(frontier.len());

    for block in frontier {
      match carve(block, *excluded) {
        Ok(pieces) => remaining.extend(pieces),
        Err(err) => {
          debug!("exclusion {} does not apply to {}: {}", excluded, block, err);
          remaining.push(block);
        }
      }
    }

    frontier = remaining;
  }

  frontier.sort_by_key(|network| (network.ip(), network.prefix()));
  frontier
}

fn carve(block: IpNetwork, excluded: IpNetwork) -> Result<Vec<IpNetwork>, SplitError> {
  if contains_network(&block, &excluded)? {
    split_around(block, excluded)
  } else {
    Ok(vec![block])
  }
}
