use super::error::Error;
use failure::Fallible;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const DIR: &str = "dir";
pub const PROJECT: &str = "project";
pub const SYMLINK: &str = "symlink";

/// A Name identifies one version of one CM object.
///
/// Names compare, hash and sort field by field, which agrees with comparing their path-forms
/// since no field may contain a separator.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    name: String,
    version: String,
    category: String,
    instance: String,
}

impl Name {
    /// Create a new name from its parts, failing if any part would not survive a trip through
    /// both textual forms.
    pub fn new<S: Into<String>>(name: S, version: S, category: S, instance: S) -> Fallible<Name> {
        let name = Name {
            name: name.into(),
            version: version.into(),
            category: category.into(),
            instance: instance.into(),
        };
        name.validate()?;
        Ok(name)
    }

    /// Parse either textual form.  Text containing a `:` must be in object-form; anything else
    /// must be in path-form.
    pub fn parse(text: &str) -> Fallible<Name> {
        if text.contains(':') {
            Name::parse_object_form(text)
        } else {
            Name::parse_path_form(text)
        }
    }

    fn parse_object_form(text: &str) -> Fallible<Name> {
        let mut parts = text.rsplitn(3, ':');
        let instance = parts.next();
        let category = parts.next();
        let versioned = parts.next();
        match (versioned, category, instance) {
            (Some(versioned), Some(category), Some(instance)) => match versioned.rfind('-') {
                Some(i) => Name::new(&versioned[..i], &versioned[i + 1..], category, instance)
                    .map_err(|_| Error::Format(text.to_string()).into()),
                None => Err(Error::Format(text.to_string()).into()),
            },
            _ => Err(Error::Format(text.to_string()).into()),
        }
    }

    fn parse_path_form(text: &str) -> Fallible<Name> {
        let parts: Vec<&str> = text.split('/').collect();
        if parts.len() != 4 {
            return Err(Error::Format(text.to_string()).into());
        }
        Name::new(parts[2], parts[3], parts[1], parts[0])
            .map_err(|_| Error::Format(text.to_string()).into())
    }

    fn validate(&self) -> Fallible<()> {
        let fields = [&self.name, &self.version, &self.category, &self.instance];
        let bad_field = fields
            .iter()
            .any(|f| f.is_empty() || f.contains('/') || f.contains(':'));
        // the version is split off at the last '-', so it may not contain one itself
        if bad_field || self.version.contains('-') {
            return Err(Error::Format(self.to_object_form()).into());
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn is_dir(&self) -> bool {
        self.category == DIR
    }

    pub fn is_project(&self) -> bool {
        self.category == PROJECT
    }

    /// Serialize as `name-version:category:instance`
    pub fn to_object_form(&self) -> String {
        format!(
            "{}-{}:{}:{}",
            self.name, self.version, self.category, self.instance
        )
    }

    /// Serialize as `instance/category/name/version`
    pub fn to_path_form(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.instance, self.category, self.name, self.version
        )
    }

    /// True if `other` names the same object as this one, in any version.
    pub fn same_object(&self, other: &Name) -> bool {
        self.name == other.name
            && self.instance == other.instance
            && self.category == other.category
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_object_form())
    }
}

impl FromStr for Name {
    type Err = failure::Error;

    fn from_str(s: &str) -> Fallible<Name> {
        Name::parse(s)
    }
}

// Names appear in repository dumps and archives as object-form strings.
impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_object_form())
    }
}

struct NameVisitor;

impl<'de> Visitor<'de> for NameVisitor {
    type Value = Name;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a CM object name")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Name, E> {
        Name::parse(v).map_err(|e| E::custom(e))
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Name, D::Error> {
        deserializer.deserialize_str(NameVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_object_form() -> Fallible<()> {
        let name = Name::parse("foo.c-1.2:csrc:3")?;
        assert_eq!(name.name(), "foo.c");
        assert_eq!(name.version(), "1.2");
        assert_eq!(name.category(), "csrc");
        assert_eq!(name.instance(), "3");
        Ok(())
    }

    #[test]
    fn parse_object_form_hyphenated_name() -> Fallible<()> {
        let name = Name::parse("my-lib-src-7:dir:1")?;
        assert_eq!(name.name(), "my-lib-src");
        assert_eq!(name.version(), "7");
        Ok(())
    }

    #[test]
    fn parse_path_form() -> Fallible<()> {
        let name = Name::parse("3/csrc/foo.c/1.2")?;
        assert_eq!(name, Name::new("foo.c", "1.2", "csrc", "3")?);
        Ok(())
    }

    #[test]
    fn forms_round_trip() -> Fallible<()> {
        for text in &["a-1:ascii:1", "1/dir/src/4", "x-y-z-2.1:project:2", "1/task/42/1"] {
            let name = Name::parse(text)?;
            assert_eq!(Name::parse(&name.to_object_form())?, name);
            assert_eq!(Name::parse(&name.to_path_form())?, name);
        }
        Ok(())
    }

    #[test]
    fn parse_malformed() {
        for text in &[
            "",
            "nodash:ascii:1",
            "a-1:ascii",
            "-1:ascii:1",
            "a-:ascii:1",
            "a-1::1",
            "1/ascii/a",
            "1/ascii/a/1/extra",
            "1//a/1",
            "1/ascii/a/1-2",
        ] {
            let err = Name::parse(text).unwrap_err();
            assert_eq!(
                err.downcast_ref::<Error>(),
                Some(&Error::Format(text.to_string())),
                "parsing {:?}",
                text
            );
        }
    }

    #[test]
    fn same_object_ignores_version() -> Fallible<()> {
        let a = Name::parse("a.txt-1:ascii:1")?;
        let b = Name::parse("a.txt-2:ascii:1")?;
        let c = Name::parse("a.txt-1:ascii:2")?;
        let d = Name::parse("a.txt-1:dir:1")?;
        assert!(a.same_object(&a));
        assert!(a.same_object(&b));
        assert!(b.same_object(&a));
        assert!(!a.same_object(&c));
        assert!(!a.same_object(&d));
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn serde_as_object_form() -> Fallible<()> {
        let name = Name::parse("1/dir/src/2")?;
        let json = serde_json::to_string(&name)?;
        assert_eq!(json, "\"src-2:dir:1\"");
        let back: Name = serde_json::from_str(&json)?;
        assert_eq!(back, name);
        assert!(serde_json::from_str::<Name>("\"garbage\"").is_err());
        Ok(())
    }
}
