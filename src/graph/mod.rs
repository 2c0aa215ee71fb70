//! The containment graph of one project baseline, and path resolution over it.
//!
//! A `ProjectGraph` is built once from a project's exported object set and is read-only
//! afterward.  It maps every bound object to its containing directory, with sub-projects
//! flattened away so that projects never appear as path segments.  A `PathResolver` walks that
//! map from an object up to the root, consulting the repository's version-successor relation
//! when an object version is not (yet) bound into the snapshot.

mod graph;
pub use self::graph::{Parent, ProjectGraph};

mod resolver;
pub use self::resolver::{successor_search, PathResolver, DEFAULT_MAX_SUCCESSOR_HOPS};
