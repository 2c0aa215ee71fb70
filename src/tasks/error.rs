use crate::name::Name;
use failure::Fail;

#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    #[fail(
        display = "Cannot choose a baseline for {} among {:?}",
        project, candidates
    )]
    AmbiguousBaseline {
        project: Name,
        candidates: Vec<Name>,
    },

    #[fail(display = "Task {} has no numeric identifier", _0)]
    BadTaskId(Name),
}
