use crate::name::{Name, SYMLINK};
use crate::query::{self, QueryService};
use crate::store::{fetch, Attributes, ObjectRecord, ObjectStore};
use failure::Fallible;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// The container of an object within a project's tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Parent {
    /// The object sits at the top of the tree.
    Root,

    /// The object sits inside this directory.
    Object(Name),
}

/// The flattened containment graph of one project baseline.
#[derive(Debug)]
pub struct ProjectGraph {
    root: Name,
    attributes: Attributes,

    /// Every exported record, by name
    records: HashMap<Name, ObjectRecord>,

    /// Containment, keyed by every bound non-project object
    parents: BTreeMap<Name, Parent>,

    /// (name, category, instance) of every key in `parents`
    objects: HashSet<(String, String, String)>,
}

impl ProjectGraph {
    /// Build the graph for project `root` from its exported object set.
    pub fn build(root: Name, attributes: Attributes, records: Vec<ObjectRecord>) -> ProjectGraph {
        // every binding recorded by any project, sub-projects included
        let mut bound: BTreeMap<Name, Name> = BTreeMap::new();
        for record in records.iter().filter(|r| r.name.is_project()) {
            for binding in record.bindings.iter() {
                if binding.child == binding.parent {
                    warn!("{} binds {} into itself; ignoring", record.name, binding.child);
                    continue;
                }
                bound.insert(binding.child.clone(), binding.parent.clone());
            }
        }

        let mut parents = BTreeMap::new();
        for (child, parent) in bound.iter() {
            if child.is_project() {
                continue;
            }
            let parent = if parent.is_project() {
                containing_directory(&bound, parent)
            } else {
                Parent::Object(parent.clone())
            };
            if parent == Parent::Object(child.clone()) {
                warn!("{} would contain itself; leaving it unbound", child);
                continue;
            }
            parents.insert(child.clone(), parent);
        }

        let objects = parents.keys().map(object_key).collect();
        let records = records.into_iter().map(|r| (r.name.clone(), r)).collect();
        debug!("{} binds {} objects", root, parents.len());

        ProjectGraph {
            root,
            attributes,
            records,
            parents,
            objects,
        }
    }

    /// Fetch project `root` from the store and build its graph.
    pub fn load<S>(store: &S, root: &Name, workdir: &Path, attempts: usize) -> Fallible<ProjectGraph>
    where
        S: ObjectStore + ?Sized,
    {
        let archive = fetch(store, root, workdir, attempts)?;
        let attributes = store.read_attributes(&archive)?;
        let records = store.read_exported_objects(&archive)?;
        Ok(ProjectGraph::build(root.clone(), attributes, records))
    }

    /// The project this graph was built for
    pub fn root(&self) -> &Name {
        &self.root
    }

    /// The attributes of the project itself
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Look up the container of `name`, if this exact version is bound into the project.
    pub fn parent(&self, name: &Name) -> Option<&Parent> {
        self.parents.get(name)
    }

    /// Every bound object that is neither a directory nor a project, in name order.
    pub fn files(&self) -> impl Iterator<Item = &Name> {
        self.parents
            .keys()
            .filter(|name| !name.is_dir() && !name.is_project())
    }

    /// True if any version of `name`'s object is bound into the project.
    pub fn contains(&self, name: &Name) -> bool {
        self.objects.contains(&object_key(name))
    }

    /// Get the content of `name`: inline from the export when present, otherwise from the
    /// repository.  Symlinks without inline content resolve to their `source` attribute.
    pub fn content_of<Q>(&self, query: &Q, name: &Name) -> Fallible<Vec<u8>>
    where
        Q: QueryService + ?Sized,
    {
        if let Some(content) = self.records.get(name).and_then(|r| r.content.as_ref()) {
            return Ok(content.clone());
        }
        if name.category() == SYMLINK {
            return match query.attribute(name, "source")? {
                Some(source) => Ok(source.into_bytes()),
                None => Err(query::Error::MissingAttribute(name.clone(), "source".into()).into()),
            };
        }
        query.cat(name)
    }
}

fn object_key(name: &Name) -> (String, String, String) {
    (
        name.name().to_string(),
        name.category().to_string(),
        name.instance().to_string(),
    )
}

/// Find the directory containing `project`, skipping over any projects it is nested in
/// directly.  A project bound nowhere sits at the root.
fn containing_directory(bound: &BTreeMap<Name, Name>, project: &Name) -> Parent {
    let mut seen = HashSet::new();
    let mut current = project;
    loop {
        if !seen.insert(current) {
            warn!("projects bound in a cycle at {}", current);
            return Parent::Root;
        }
        match bound.get(current) {
            None => return Parent::Root,
            Some(parent) if parent.is_project() => current = parent,
            Some(parent) => return Parent::Object(parent.clone()),
        }
    }
}
