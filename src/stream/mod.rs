//! The commit stream: records in the importer's line-oriented, length-prefixed format, and the
//! synthesis of those records from tasks and project graphs.
//!
//! Each record is rendered completely in memory before any of it is written, so a failure while
//! gathering content never leaves a partial record in the output.

mod record;
pub use self::record::{Commit, FileChange, Identity, Mode, Tag};

mod writer;
pub use self::writer::StreamWriter;

mod synth;
pub use self::synth::Synthesizer;
