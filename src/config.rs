//! Run configuration, read from a JSON file.  Every setting has a default, so `{}` is a valid
//! configuration.

use crate::graph::DEFAULT_MAX_SUCCESSOR_HOPS;
use failure::{Fail, Fallible};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Could not read configuration {}: {}", _0, _1)]
    Unreadable(String, String),

    #[fail(display = "Invalid configuration: {}", _0)]
    Invalid(String),
}

/// The identity a CM login is written as.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The ref every commit is made on
    pub branch: String,

    /// An existing commit the first commit of the run builds on
    pub from: Option<String>,

    /// Domain of the email addresses derived from CM logins
    pub email_domain: String,

    /// Explicit identities for CM logins
    pub authors: BTreeMap<String, Author>,

    /// Key of the trailer line cross-referencing each commit to its task
    pub trailer: String,

    pub max_successor_hops: usize,

    /// Exports attempted before an archive is given up on
    pub fetch_attempts: usize,

    /// Categories written with the executable file mode
    pub executable_categories: Vec<String>,

    /// Where archives are exported to; defaults to a directory under the system temp dir
    pub workdir: Option<PathBuf>,

    /// Projects processed concurrently
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            branch: "refs/heads/master".to_string(),
            from: None,
            email_domain: "localhost".to_string(),
            authors: BTreeMap::new(),
            trailer: "Task".to_string(),
            max_successor_hops: DEFAULT_MAX_SUCCESSOR_HOPS,
            fetch_attempts: 3,
            executable_categories: vec!["executable".to_string()],
            workdir: None,
            threads: 4,
        }
    }
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Fallible<Config> {
        let path = path.as_ref();
        let unreadable = |msg: String| Error::Unreadable(path.display().to_string(), msg);
        let text = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        let config: Config = serde_json::from_str(&text).map_err(|e| unreadable(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Fallible<()> {
        if self.fetch_attempts == 0 {
            return Err(Error::Invalid("fetch_attempts must be at least 1".into()).into());
        }
        if self.threads == 0 {
            return Err(Error::Invalid("threads must be at least 1".into()).into());
        }
        if self.branch.is_empty() {
            return Err(Error::Invalid("branch must not be empty".into()).into());
        }
        Ok(())
    }

    /// The directory archives are exported to
    pub fn workdir(&self) -> PathBuf {
        match self.workdir {
            Some(ref dir) => dir.clone(),
            None => env::temp_dir().join("cmexport"),
        }
    }

    /// The committer identity for a CM login
    pub fn author(&self, login: &str) -> Author {
        match self.authors.get(login) {
            Some(author) => author.clone(),
            None => Author {
                name: login.to_string(),
                email: format!("{}@{}", login, self.email_domain),
            },
        }
    }
}
