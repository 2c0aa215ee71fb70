use crate::name::Name;
use failure::Fallible;
use std::collections::BTreeSet;

/// The result of a structural diff between two versions of a directory: the path-qualified
/// entries present only in the old version, and those present only in the new one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diff {
    pub removed: BTreeSet<String>,
    pub added: BTreeSet<String>,
}

/// Graph and attribute queries against the CM repository.
///
/// Implementations must be shareable between threads, since independent projects may be
/// processed concurrently against the same repository.
pub trait QueryService: Send + Sync {
    /// The direct version-successors of `name`.
    fn successors(&self, name: &Name) -> Fallible<Vec<Name>>;

    /// The direct version-predecessors of `name`.
    fn predecessors(&self, name: &Name) -> Fallible<Vec<Name>>;

    /// Structurally diff two versions of a directory.
    fn diff(&self, old: &Name, new: &Name) -> Fallible<Diff>;

    /// Get an attribute of `name`, or None if the object does not carry it.
    fn attribute(&self, name: &Name, key: &str) -> Fallible<Option<String>>;

    /// Get the content of a version-controlled object.
    fn cat(&self, name: &Name) -> Fallible<Vec<u8>>;

    /// The project that `project` was derived from (its baseline project), if any.
    fn is_baseline_project_of(&self, project: &Name) -> Fallible<Option<Name>>;

    /// The candidate baselines containing `project`.
    fn baselines_of(&self, project: &Name) -> Fallible<Vec<Name>>;

    /// The tasks included in `baseline`, in retrieval order.
    fn baseline_tasks(&self, baseline: &Name) -> Fallible<Vec<Name>>;
}
