//! Detection of files deleted from a changed directory.
//!
//! A directory version may have several predecessors.  For each, the repository's diff lists
//! the entries removed and added on the way to the new version; an entry that was both removed
//! and added was replaced, not deleted.  The deletions of a directory are the union over all
//! of its predecessors.

use crate::name::Name;
use crate::query::{Diff, QueryService};
use failure::Fallible;
use std::collections::BTreeSet;

/// Compute the leaf names deleted across a set of predecessor transitions.
pub fn deleted_names(diffs: &[Diff]) -> BTreeSet<String> {
    let mut deleted = BTreeSet::new();
    for diff in diffs {
        let added: BTreeSet<&str> = diff.added.iter().filter_map(|p| leaf(p)).collect();
        deleted.extend(
            diff.removed
                .iter()
                .filter_map(|p| leaf(p))
                .filter(|name| !added.contains(name))
                .map(|name| name.to_string()),
        );
    }
    deleted
}

/// Find the leaf names deleted from directory `dir` relative to its predecessors.  A directory
/// at its first version has no predecessors, and so no deletions.
pub fn detect_deletions<Q>(query: &Q, dir: &Name) -> Fallible<BTreeSet<String>>
where
    Q: QueryService + ?Sized,
{
    let diffs = query
        .predecessors(dir)?
        .iter()
        .map(|pred| query.diff(pred, dir))
        .collect::<Fallible<Vec<_>>>()?;
    Ok(deleted_names(&diffs))
}

/// The trailing segment of a path-qualified entry, ignoring any trailing `/`.
fn leaf(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}
