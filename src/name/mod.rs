//! Four-part CM object identifiers.
//!
//! Every object in the CM repository is identified by a `name`, a `version`, a `category`
//! (file, dir, project, symlink, task, baseline, ..) and an `instance`.  Identifiers appear in
//! two textual forms:
//!
//! * object-form: `name-version:category:instance`
//! * path-form: `instance/category/name/version`
//!
//! # Examples
//!
//! ```
//! use cmexport::name::Name;
//! let name: Name = "main.c-3:csrc:1".parse().unwrap();
//! assert_eq!(name.to_path_form(), "1/csrc/main.c/3");
//! assert!(name.same_object(&"1/csrc/main.c/4".parse().unwrap()));
//! ```

mod name;
pub use self::name::{Name, DIR, PROJECT, SYMLINK};

mod error;
pub use self::error::*;
