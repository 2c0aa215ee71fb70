use crate::name::Name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An attribute bag, as attached to every CM object.
pub type Attributes = BTreeMap<String, String>;

/// A binding places `child` inside `parent`, which is either a directory or a project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub child: Name,
    pub parent: Name,
}

/// One object as exported from the CM repository.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectRecord {
    pub name: Name,
    pub attributes: Attributes,

    /// Content carried inline in the export, for version-controlled objects.  When absent, the
    /// content must be fetched from the repository.
    pub content: Option<Vec<u8>>,

    /// Bindings recorded by structural objects (projects).
    pub bindings: Vec<Binding>,
}

impl ObjectRecord {
    /// Create a record with no attributes, content or bindings.
    pub fn new(name: Name) -> ObjectRecord {
        ObjectRecord {
            name,
            attributes: Attributes::new(),
            content: None,
            bindings: vec![],
        }
    }

    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_content<C: Into<Vec<u8>>>(mut self, content: C) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Add a binding of `child` into `parent`.
    pub fn with_binding(mut self, child: Name, parent: Name) -> Self {
        self.bindings.push(Binding { child, parent });
        self
    }
}
