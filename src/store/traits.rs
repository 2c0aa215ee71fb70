use super::record::{Attributes, ObjectRecord};
use crate::name::Name;
use failure::Fallible;
use std::path::Path;

/// Object Store
///
/// Exports a project's or task's full data to a local archive, and reads that archive back.
/// The archive format belongs to the implementation; callers only see paths.
pub trait ObjectStore: Send + Sync {
    /// Export `name` to an archive at `destination`, replacing anything already there.
    fn export(&self, name: &Name, destination: &Path) -> Fallible<()>;

    /// Check the integrity of an exported archive.
    fn verify(&self, archive: &Path) -> bool;

    /// Read every object contained in an archive.  For a project this is its full flat object
    /// set, including sub-projects; for a task it is the set of changed objects.
    fn read_exported_objects(&self, archive: &Path) -> Fallible<Vec<ObjectRecord>>;

    /// Read the attributes of the archive's root object.
    fn read_attributes(&self, archive: &Path) -> Fallible<Attributes>;
}
