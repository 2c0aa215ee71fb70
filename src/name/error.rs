use failure::Fail;

#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    #[fail(display = "Malformed object name: {:?}", _0)]
    Format(String),
}
