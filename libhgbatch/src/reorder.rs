// Copyright 2018-2019 Joe Neeman.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// See the LICENSE-APACHE or LICENSE-MIT files at the top-level directory
// of this distribution.

use std::collections::HashSet;

use crate::{Error, PatchFile, RevId};

/// Puts a batch of patches into an order in which each one can be applied on top of the previous.
///
/// Patch trackers number patches in the order they arrived, which isn't necessarily the order in
/// which they were written. We rebuild the chain from the `# Node ID` and `# Parent` headers: at
/// each step, the next patch is the first remaining one whose parent is not the node of another
/// remaining patch. Patches without a parent, or whose parent is outside the batch, are always
/// eligible. Ties are broken by the input order, so a batch with no metadata at all comes back
/// unchanged.
///
/// If every remaining patch waits on another remaining patch (a cycle), we return
/// [`Error::CyclicOrUnresolvedDependency`].
pub fn reorder(patches: Vec<PatchFile>) -> Result<Vec<PatchFile>, Error> {
    let mut remaining = patches.into_iter().map(Some).collect::<Vec<_>>();
    let mut ordered = Vec::with_capacity(remaining.len());

    while ordered.len() < remaining.len() {
        let next = {
            let pending_nodes = remaining
                .iter()
                .flatten()
                .filter_map(|p| p.header.node_id.as_ref())
                .collect::<HashSet<&RevId>>();
            remaining.iter().position(|p| match p {
                Some(p) => p
                    .header
                    .parent_id
                    .as_ref()
                    .is_none_or(|parent| !pending_nodes.contains(parent)),
                None => false,
            })
        };

        match next.and_then(|idx| remaining[idx].take()) {
            Some(patch) => {
                debug!("placing {:?} at position {}", patch.path, ordered.len());
                ordered.push(patch);
            }
            None => {
                return Err(Error::CyclicOrUnresolvedDependency {
                    remaining: remaining.into_iter().flatten().map(|p| p.path).collect(),
                });
            }
        }
    }
    Ok(ordered)
}
