//! Migration of configuration-management history into a commit stream.
//!
//! A CM repository records files and directories as versioned objects bound into project trees,
//! and tasks as sets of object-version changes.  This crate reconstructs, for each project
//! version, the tree every object sits in and the tasks that produced the version, and writes
//! each task as a commit followed by a reconciliation commit and tag for the version itself.
//!
//! The repository is reached through two collaborators: a [`query::QueryService`] answering
//! graph questions, and a [`store::ObjectStore`] exporting archives of projects and tasks.
//! [`repo::Repository`] implements both over a JSON dump.

pub mod config;
pub mod deletions;
pub mod export;
pub mod graph;
pub mod history;
pub mod name;
pub mod query;
pub mod repo;
pub mod store;
pub mod stream;
pub mod tasks;
pub mod timestamp;
