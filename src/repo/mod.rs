//! An offline CM repository, loaded from a JSON dump.
//!
//! A dump maps object names (in object-form) to everything the exporter needs to know about
//! them: attributes, content, version successors, project bindings, baselines and their tasks,
//! and task changes.  Directory diffs are listed separately.  `Repository` answers both the
//! `QueryService` and the `ObjectStore` interfaces from that data, so a dump is enough to run a
//! complete export without access to the live CM server.
//!
//! Content that is valid UTF-8 is a plain string; any other content is written as
//! `{"base64": "..."}`.
//!
//! Every directory version a task changes must have a diff listed against each of its
//! predecessors.  A missing diff is an error, and aborts the export.
//!
//! ```json
//! {
//!   "objects": {
//!     "proj-1:project:1": {
//!       "attributes": {"owner": "alice", "create_time": "2012-03-13T11:04:31Z"},
//!       "bindings": [
//!         {"child": "src-2:dir:1", "parent": "proj-1:project:1"},
//!         {"child": "main.c-1:csrc:1", "parent": "src-2:dir:1"},
//!         {"child": "logo.png-1:binary:1", "parent": "src-2:dir:1"}
//!       ],
//!       "baselines": ["proj_20120313-1:baseline:1"]
//!     },
//!     "src-1:dir:1": {"successors": ["src-2:dir:1"]},
//!     "src-2:dir:1": {},
//!     "main.c-1:csrc:1": {"content": "int main;\n"},
//!     "logo.png-1:binary:1": {"content": {"base64": "iVBORw0KGgo="}},
//!     "proj_20120313-1:baseline:1": {"tasks": ["17-1:task:probtrac"]},
//!     "17-1:task:probtrac": {
//!       "attributes": {"resolver": "bob", "task_synopsis": "Add main.c"},
//!       "changes": ["src-2:dir:1", "main.c-1:csrc:1"]
//!     }
//!   },
//!   "diffs": [
//!     {"old": "src-1:dir:1", "new": "src-2:dir:1", "removed": ["src#1/old.c"], "added": ["src#2/main.c"]}
//!   ]
//! }
//! ```

mod archive;
mod content;
mod repository;

pub use self::repository::Repository;
