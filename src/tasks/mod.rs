//! Tasks, and the selection and ordering of the tasks new in a project baseline.
//!
//! The tasks a project version introduced are those in its baseline that are not in its parent
//! project's baseline.  They become commits in order of completion.

mod error;
pub use self::error::*;

mod task;
pub use self::task::Task;

mod selector;
pub use self::selector::{new_tasks, order_tasks, pick_baseline, TaskSelector};
