use super::archive::{Archive, ArchivedObject, Payload};
use crate::name::Name;
use crate::query::{self, Diff, QueryService};
use crate::store::{Attributes, Binding, ObjectRecord, ObjectStore};
use failure::Fallible;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Repository is an in-memory CM repository, usually loaded from a JSON dump.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    objects: BTreeMap<Name, StoredObject>,

    #[serde(default)]
    diffs: Vec<StoredDiff>,
}

/// Everything known about one object.  Most fields only apply to some categories.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct StoredObject {
    #[serde(default)]
    attributes: Attributes,

    #[serde(default, with = "super::content")]
    content: Option<Vec<u8>>,

    #[serde(default)]
    successors: Vec<Name>,

    /// projects: bindings of members into directories or into the project itself
    #[serde(default)]
    bindings: Vec<Binding>,

    /// projects: the project this one was derived from
    #[serde(default)]
    baseline_project: Option<Name>,

    /// projects: candidate baselines
    #[serde(default)]
    baselines: Vec<Name>,

    /// baselines: included tasks
    #[serde(default)]
    tasks: Vec<Name>,

    /// tasks: changed objects
    #[serde(default)]
    changes: Vec<Name>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredDiff {
    old: Name,
    new: Name,
    #[serde(default)]
    removed: BTreeSet<String>,
    #[serde(default)]
    added: BTreeSet<String>,
}

impl Repository {
    /// Create a new, empty repository.
    pub fn new() -> Repository {
        Default::default()
    }

    /// Load a repository from a JSON dump.
    pub fn load<P: AsRef<Path>>(path: P) -> Fallible<Repository> {
        let file = File::open(path.as_ref())?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Add an object, or replace the attributes, content and bindings of an existing one.
    pub fn insert(&mut self, record: ObjectRecord) -> &mut Self {
        let stored = self.objects.entry(record.name).or_default();
        stored.attributes = record.attributes;
        stored.content = record.content;
        stored.bindings = record.bindings;
        self
    }

    /// Record that `new` is a version-successor of `old`.
    pub fn add_successor(&mut self, old: &Name, new: &Name) -> &mut Self {
        self.objects.entry(new.clone()).or_default();
        self.objects
            .entry(old.clone())
            .or_default()
            .successors
            .push(new.clone());
        self
    }

    /// Record the diff between two versions of a directory.
    pub fn add_diff(&mut self, old: &Name, new: &Name, removed: &[&str], added: &[&str]) -> &mut Self {
        self.diffs.push(StoredDiff {
            old: old.clone(),
            new: new.clone(),
            removed: removed.iter().map(|s| s.to_string()).collect(),
            added: added.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Record that `project` was derived from `parent`.
    pub fn set_baseline_project(&mut self, project: &Name, parent: &Name) -> &mut Self {
        self.objects.entry(project.clone()).or_default().baseline_project = Some(parent.clone());
        self
    }

    /// Add a candidate baseline of `project`, containing `tasks`.
    pub fn add_baseline(&mut self, project: &Name, baseline: &Name, tasks: &[Name]) -> &mut Self {
        self.objects
            .entry(baseline.clone())
            .or_default()
            .tasks
            .extend(tasks.iter().cloned());
        self.objects
            .entry(project.clone())
            .or_default()
            .baselines
            .push(baseline.clone());
        self
    }

    /// Add a task, with the objects it changed.
    pub fn add_task(&mut self, task: ObjectRecord, changes: &[Name]) -> &mut Self {
        let name = task.name.clone();
        self.insert(task);
        if let Some(stored) = self.objects.get_mut(&name) {
            stored.changes.extend(changes.iter().cloned());
        }
        self
    }

    fn object(&self, name: &Name) -> Fallible<&StoredObject> {
        match self.objects.get(name) {
            Some(obj) => Ok(obj),
            None => Err(query::Error::UnknownObject(name.clone()).into()),
        }
    }

    fn archived(&self, name: &Name) -> Fallible<ArchivedObject> {
        let obj = self.object(name)?;
        Ok(ArchivedObject {
            name: name.clone(),
            attributes: obj.attributes.clone(),
            content: obj.content.clone(),
            bindings: obj.bindings.clone(),
        })
    }

    /// Collect a project's full flat object set: the project itself, every object bound into
    /// it, and the same for each bound sub-project.
    fn project_members(&self, project: &Name) -> Fallible<Vec<ArchivedObject>> {
        let mut seen = BTreeSet::new();
        let mut pending = vec![project.clone()];
        let mut members = vec![];

        while let Some(name) = pending.pop() {
            if !seen.insert(name.clone()) {
                continue;
            }
            let obj = self.archived(&name)?;
            if name.is_project() {
                for binding in obj.bindings.iter() {
                    pending.push(binding.child.clone());
                }
            }
            members.push(obj);
        }

        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }
}

impl QueryService for Repository {
    fn successors(&self, name: &Name) -> Fallible<Vec<Name>> {
        Ok(self.object(name)?.successors.clone())
    }

    fn predecessors(&self, name: &Name) -> Fallible<Vec<Name>> {
        self.object(name)?;
        Ok(self
            .objects
            .iter()
            .filter(|(_, obj)| obj.successors.contains(name))
            .map(|(n, _)| n.clone())
            .collect())
    }

    fn diff(&self, old: &Name, new: &Name) -> Fallible<Diff> {
        match self.diffs.iter().find(|d| &d.old == old && &d.new == new) {
            Some(d) => Ok(Diff {
                removed: d.removed.clone(),
                added: d.added.clone(),
            }),
            None => Err(query::Error::NoDiff(old.clone(), new.clone()).into()),
        }
    }

    fn attribute(&self, name: &Name, key: &str) -> Fallible<Option<String>> {
        Ok(self.object(name)?.attributes.get(key).cloned())
    }

    fn cat(&self, name: &Name) -> Fallible<Vec<u8>> {
        match self.object(name)?.content {
            Some(ref content) => Ok(content.clone()),
            None => Err(query::Error::Failed(format!("{} has no content", name)).into()),
        }
    }

    fn is_baseline_project_of(&self, project: &Name) -> Fallible<Option<Name>> {
        Ok(self.object(project)?.baseline_project.clone())
    }

    fn baselines_of(&self, project: &Name) -> Fallible<Vec<Name>> {
        Ok(self.object(project)?.baselines.clone())
    }

    fn baseline_tasks(&self, baseline: &Name) -> Fallible<Vec<Name>> {
        Ok(self.object(baseline)?.tasks.clone())
    }
}

impl ObjectStore for Repository {
    fn export(&self, name: &Name, destination: &Path) -> Fallible<()> {
        let root = self.object(name)?;
        let objects = if name.is_project() {
            self.project_members(name)?
        } else {
            root.changes
                .iter()
                .map(|n| self.archived(n))
                .collect::<Fallible<Vec<_>>>()?
        };

        let archive = Archive::new(Payload {
            name: name.clone(),
            attributes: root.attributes.clone(),
            objects,
        })?;
        archive.write(destination)
    }

    fn verify(&self, archive: &Path) -> bool {
        match Archive::read(archive) {
            Ok(archive) => archive.is_intact(),
            Err(_) => false,
        }
    }

    fn read_exported_objects(&self, archive: &Path) -> Fallible<Vec<ObjectRecord>> {
        let payload = Archive::read(archive)?.into_payload();
        Ok(payload.objects.into_iter().map(ObjectRecord::from).collect())
    }

    fn read_attributes(&self, archive: &Path) -> Fallible<Attributes> {
        Ok(Archive::read(archive)?.into_payload().attributes)
    }
}
