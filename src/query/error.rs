use crate::name::Name;
use failure::Fail;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Unknown object: {}", _0)]
    UnknownObject(Name),

    #[fail(display = "Object {} has no attribute {:?}", _0, _1)]
    MissingAttribute(Name, String),

    #[fail(display = "No diff recorded between {} and {}", _0, _1)]
    NoDiff(Name, Name),

    #[fail(display = "Query failed: {}", _0)]
    Failed(String),
}
