//! Serde encoding of object content.
//!
//! Content that is valid UTF-8 is stored as a plain JSON string, so dumps of text files stay
//! readable.  Anything else is stored as `{"base64": "..."}`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::str;

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Encoded {
    Text(String),
    Binary { base64: String },
}

pub(super) fn serialize<S: Serializer>(
    content: &Option<Vec<u8>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let encoded = content.as_ref().map(|bytes| match str::from_utf8(bytes) {
        Ok(text) => Encoded::Text(text.to_string()),
        Err(_) => Encoded::Binary {
            base64: STANDARD.encode(bytes),
        },
    });
    encoded.serialize(serializer)
}

pub(super) fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<u8>>, D::Error> {
    match Option::<Encoded>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Encoded::Text(text)) => Ok(Some(text.into_bytes())),
        Some(Encoded::Binary { base64 }) => STANDARD
            .decode(base64)
            .map(Some)
            .map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use failure::Fallible;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(default, with = "super")]
        content: Option<Vec<u8>>,
    }

    fn holder(content: Option<&[u8]>) -> Holder {
        Holder {
            content: content.map(|c| c.to_vec()),
        }
    }

    #[test]
    fn text_stays_readable() -> Fallible<()> {
        let json = serde_json::to_string(&holder(Some(b"hi\n")))?;
        assert_eq!(json, r#"{"content":"hi\n"}"#);
        assert_eq!(serde_json::from_str::<Holder>(&json)?, holder(Some(b"hi\n")));
        Ok(())
    }

    #[test]
    fn binary_is_base64() -> Fallible<()> {
        let bytes = [0xff, 0x00, 0x89];
        let json = serde_json::to_string(&holder(Some(&bytes)))?;
        assert_eq!(json, r#"{"content":{"base64":"/wCJ"}}"#);
        assert_eq!(serde_json::from_str::<Holder>(&json)?, holder(Some(&bytes)));
        Ok(())
    }

    #[test]
    fn absent_and_null() -> Fallible<()> {
        assert_eq!(serde_json::from_str::<Holder>("{}")?, holder(None));
        assert_eq!(serde_json::from_str::<Holder>(r#"{"content":null}"#)?, holder(None));
        assert!(serde_json::from_str::<Holder>(r#"{"content":{"base64":"!!"}}"#).is_err());
        Ok(())
    }
}
