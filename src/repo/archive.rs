use crate::name::Name;
use crate::store::{Attributes, Binding, Error, ObjectRecord};
use crypto::digest::Digest;
use crypto::sha2::Sha256;
use failure::Fallible;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The on-disk form of an export: the payload, and a checksum over its JSON encoding.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct Archive {
    checksum: String,
    payload: Payload,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub(super) struct Payload {
    pub(super) name: Name,
    pub(super) attributes: Attributes,
    pub(super) objects: Vec<ArchivedObject>,
}

/// A raw object, as stored in an archive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(super) struct ArchivedObject {
    pub(super) name: Name,
    #[serde(default)]
    pub(super) attributes: Attributes,
    #[serde(default, with = "super::content")]
    pub(super) content: Option<Vec<u8>>,
    #[serde(default)]
    pub(super) bindings: Vec<Binding>,
}

impl From<ArchivedObject> for ObjectRecord {
    fn from(obj: ArchivedObject) -> ObjectRecord {
        ObjectRecord {
            name: obj.name,
            attributes: obj.attributes,
            content: obj.content,
            bindings: obj.bindings,
        }
    }
}

impl Archive {
    pub(super) fn new(payload: Payload) -> Fallible<Archive> {
        Ok(Archive {
            checksum: checksum(&payload)?,
            payload,
        })
    }

    pub(super) fn write(&self, path: &Path) -> Fallible<()> {
        fs::write(path, serde_json::to_vec(self)?)?;
        Ok(())
    }

    /// Read an archive, without verifying its checksum.
    pub(super) fn read(path: &Path) -> Fallible<Archive> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            Error::CorruptArchive(path.display().to_string(), e.to_string()).into()
        })
    }

    pub(super) fn is_intact(&self) -> bool {
        match checksum(&self.payload) {
            Ok(sum) => sum == self.checksum,
            Err(_) => false,
        }
    }

    pub(super) fn into_payload(self) -> Payload {
        self.payload
    }
}

fn checksum(payload: &Payload) -> Fallible<String> {
    let mut sha = Sha256::new();
    sha.input_str(&serde_json::to_string(payload)?);
    Ok(sha.result_str())
}
