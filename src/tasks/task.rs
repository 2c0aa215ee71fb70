use super::error::Error;
use crate::graph::ProjectGraph;
use crate::name::Name;
use crate::store::{fetch, Attributes, ObjectStore};
use crate::timestamp::Timestamp;
use failure::Fallible;
use log::warn;
use std::collections::BTreeSet;
use std::path::Path;

/// A Task is a named set of object-version changes, with authorship and timing attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    name: Name,
    attributes: Attributes,
    changes: BTreeSet<Name>,
}

impl Task {
    pub fn new<I: IntoIterator<Item = Name>>(name: Name, attributes: Attributes, changes: I) -> Task {
        Task {
            name,
            attributes,
            changes: changes.into_iter().collect(),
        }
    }

    /// Fetch task `name` from the store.
    pub fn load<S>(store: &S, name: &Name, workdir: &Path, attempts: usize) -> Fallible<Task>
    where
        S: ObjectStore + ?Sized,
    {
        let archive = fetch(store, name, workdir, attempts)?;
        let attributes = store.read_attributes(&archive)?;
        let changes = store
            .read_exported_objects(&archive)?
            .into_iter()
            .map(|r| r.name);
        Ok(Task::new(name.clone(), attributes, changes))
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// The changed objects, in name order
    pub fn changes(&self) -> &BTreeSet<Name> {
        &self.changes
    }

    /// The task's numeric identifier, which doubles as its commit mark.
    pub fn id(&self) -> Fallible<u64> {
        self.name
            .name()
            .parse()
            .map_err(|_| Error::BadTaskId(self.name.clone()).into())
    }

    /// The login of the user who resolved the task
    pub fn resolver(&self) -> Option<&str> {
        self.attribute("resolver")
    }

    pub fn synopsis(&self) -> Option<&str> {
        self.attribute("task_synopsis")
    }

    pub fn description(&self) -> Option<&str> {
        self.attribute("task_description")
    }

    pub fn completed(&self) -> Option<Timestamp> {
        self.time("completion_date")
    }

    pub fn created(&self) -> Option<Timestamp> {
        self.time("create_time")
    }

    /// The time the task takes effect: its completion, or failing that, its creation.
    pub fn effective_time(&self) -> Option<Timestamp> {
        self.completed().or_else(|| self.created())
    }

    /// True if any of the task's changes is an object bound into `graph`.
    pub fn touches(&self, graph: &ProjectGraph) -> bool {
        self.changes.iter().any(|c| graph.contains(c))
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    fn time(&self, key: &str) -> Option<Timestamp> {
        let text = self.attribute(key)?;
        match Timestamp::parse(text) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!("task {}: ignoring {}: {}", self.name, key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repo::Repository;
    use crate::store::ObjectRecord;

    fn n(text: &str) -> Name {
        Name::parse(text).unwrap()
    }

    fn task(attrs: &[(&str, &str)]) -> Task {
        let attributes = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Task::new(n("42-1:task:probtrac"), attributes, vec![])
    }

    #[test]
    fn id() -> Fallible<()> {
        assert_eq!(task(&[]).id()?, 42);
        let bad = Task::new(n("fix-1:task:probtrac"), Attributes::new(), vec![]);
        assert_eq!(
            bad.id().unwrap_err().downcast_ref::<Error>(),
            Some(&Error::BadTaskId(n("fix-1:task:probtrac")))
        );
        Ok(())
    }

    #[test]
    fn effective_time_prefers_completion() -> Fallible<()> {
        let t = task(&[
            ("create_time", "2012-01-01T00:00:00Z"),
            ("completion_date", "2012-02-01T00:00:00Z"),
        ]);
        assert_eq!(t.effective_time(), Some(Timestamp::parse("2012-02-01T00:00:00Z")?));
        Ok(())
    }

    #[test]
    fn effective_time_falls_back_to_creation() -> Fallible<()> {
        let t = task(&[("create_time", "2012-01-01T00:00:00Z"), ("completion_date", " ")]);
        assert_eq!(t.effective_time(), Some(Timestamp::parse("2012-01-01T00:00:00Z")?));

        let t = task(&[("create_time", "2012-01-01T00:00:00Z"), ("completion_date", "soon")]);
        assert_eq!(t.effective_time(), Some(Timestamp::parse("2012-01-01T00:00:00Z")?));

        assert_eq!(task(&[]).effective_time(), None);
        Ok(())
    }

    #[test]
    fn load_from_store() -> Fallible<()> {
        let name = n("42-1:task:probtrac");
        let mut repo = Repository::new();
        repo.insert(ObjectRecord::new(n("b-1:ascii:1")))
            .insert(ObjectRecord::new(n("a-2:ascii:1")));
        repo.add_task(
            ObjectRecord::new(name.clone())
                .with_attribute("resolver", "carol")
                .with_attribute("task_synopsis", "Fix the frobnicator"),
            &[n("b-1:ascii:1"), n("a-2:ascii:1")],
        );

        let dir = tempfile::tempdir()?;
        let task = Task::load(&repo, &name, dir.path(), 3)?;
        assert_eq!(task.name(), &name);
        assert_eq!(task.resolver(), Some("carol"));
        assert_eq!(task.synopsis(), Some("Fix the frobnicator"));
        assert_eq!(task.description(), None);
        assert_eq!(
            task.changes().iter().cloned().collect::<Vec<_>>(),
            vec![n("a-2:ascii:1"), n("b-1:ascii:1")]
        );
        Ok(())
    }
}
