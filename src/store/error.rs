use crate::name::Name;
use failure::Fail;

#[derive(Debug, Fail)]
pub enum Error {
    /// The last attempt's failure is kept as the third field.
    #[fail(
        display = "Could not fetch a valid archive of {} after {} attempts: {}",
        _0, _1, _2
    )]
    ArchiveIntegrity(Name, usize, String),

    #[fail(display = "Corrupt archive {}: {}", _0, _1)]
    CorruptArchive(String, String),
}
