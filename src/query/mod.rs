//! The query interface to a CM repository.
//!
//! The core treats the repository's query engine as a synchronous oracle: every call either
//! answers or fails, and failures are fatal unless the caller explicitly handles them.

mod traits;
pub use self::traits::{Diff, QueryService};

mod error;
pub use self::error::*;
