//! Access to the CM repository's exported object data.
//!
//! An `ObjectStore` exports a project or task to a local archive and reads it back as a set of
//! `ObjectRecord`s.  Exports are flaky in practice, so `fetch` retries an export until the
//! archive passes the store's integrity check, up to a bounded number of attempts.

mod error;
pub use self::error::*;

mod record;
pub use self::record::{Attributes, Binding, ObjectRecord};

mod traits;
pub use self::traits::ObjectStore;

mod fetch;
pub use self::fetch::fetch;
