use super::record::{Commit, FileChange, Identity, Mode, Tag};
use crate::config::Config;
use crate::deletions::detect_deletions;
use crate::graph::{successor_search, PathResolver, ProjectGraph};
use crate::name::{Name, SYMLINK};
use crate::query::QueryService;
use crate::tasks::Task;
use crate::timestamp::Timestamp;
use failure::Fallible;
use log::{debug, warn};

/// A Synthesizer turns the tasks of one project, and the project itself, into commit records.
///
/// Every record is built completely before it is returned, so any content retrieval failure
/// surfaces before a byte of the record is written.
pub struct Synthesizer<'a, Q: QueryService + ?Sized> {
    query: &'a Q,
    graph: &'a ProjectGraph,
    config: &'a Config,
    resolver: PathResolver<'a, Q>,
}

impl<'a, Q: QueryService + ?Sized> Synthesizer<'a, Q> {
    pub fn new(query: &'a Q, graph: &'a ProjectGraph, config: &'a Config) -> Synthesizer<'a, Q> {
        Synthesizer {
            query,
            graph,
            config,
            resolver: PathResolver::new(graph, query).with_max_hops(config.max_successor_hops),
        }
    }

    /// Build the commit for `task`.  Deletions in changed directories come first, followed by
    /// the content of every changed file.
    pub fn task_commit(&self, task: &Task, from: Option<String>) -> Fallible<Commit> {
        let mut changes = vec![];

        for dir in task.changes().iter().filter(|c| c.is_dir()) {
            let path = match self.resolver.resolve_path(dir)? {
                Some(path) => path,
                None => {
                    warn!("task {}: cannot place directory {}; skipping", task.name(), dir);
                    continue;
                }
            };
            for leaf in detect_deletions(self.query, dir)? {
                changes.push(FileChange::Delete(format!("{}/{}", path, leaf)));
            }
        }

        for file in self.changed_files(task)? {
            match self.modify(file)? {
                Some(change) => changes.push(change),
                None => warn!("task {}: cannot place {}; skipping", task.name(), file),
            }
        }

        let login = task.resolver().unwrap_or_else(|| {
            warn!("task {} has no resolver", task.name());
            "unknown"
        });
        let when = task.effective_time().unwrap_or_else(Timestamp::epoch);

        Ok(Commit {
            branch: self.config.branch.clone(),
            mark: Some(task.id()?),
            committer: self.identity(login, when),
            message: self.message(task),
            from,
            changes,
        })
    }

    /// Build the reconciliation commit: clear the tree, then write every file the project
    /// binds that can be placed.
    pub fn baseline_commit(&self, from: Option<String>) -> Fallible<Commit> {
        let root = self.graph.root();
        let mut changes = vec![FileChange::DeleteAll];
        for file in self.graph.files() {
            match self.modify(file)? {
                Some(change) => changes.push(change),
                None => warn!("{}: cannot place {}; skipping", root, file),
            }
        }

        Ok(Commit {
            branch: self.config.branch.clone(),
            mark: None,
            committer: self.project_identity(),
            message: format!("{}\n", root),
            from,
            changes,
        })
    }

    /// Build the tag marking the reconciliation commit, named after the project version.
    pub fn baseline_tag(&self) -> Tag {
        let root = self.graph.root();
        Tag {
            name: format!("{}-{}", root.name(), root.version()),
            from: self.config.branch.clone(),
            tagger: self.project_identity(),
            message: String::new(),
        }
    }

    /// The files `task` changed, with one version per object: the version bound into the
    /// project, or failing that the latest along the successor chain.
    fn changed_files<'t>(&self, task: &'t Task) -> Fallible<Vec<&'t Name>> {
        let mut groups: Vec<Vec<&'t Name>> = vec![];
        for file in task
            .changes()
            .iter()
            .filter(|c| !c.is_dir() && !c.is_project())
        {
            match groups.iter_mut().find(|g| g[0].same_object(file)) {
                Some(group) => group.push(file),
                None => groups.push(vec![file]),
            }
        }

        let mut files = vec![];
        for versions in groups {
            let latest = self.latest_version(&versions)?;
            if versions.len() > 1 {
                debug!("task {}: writing {} of {} versions", task.name(), latest, versions.len());
            }
            files.push(latest);
        }
        Ok(files)
    }

    fn latest_version<'t>(&self, versions: &[&'t Name]) -> Fallible<&'t Name> {
        if let [only] = versions {
            return Ok(*only);
        }
        if let Some(bound) = versions.iter().find(|v| self.graph.parent(v).is_some()) {
            return Ok(*bound);
        }
        for version in versions.iter() {
            let newer = successor_search(
                self.query,
                version,
                self.config.max_successor_hops,
                |s: &Name| versions.iter().any(|v| *v == s),
            )?;
            if newer.is_none() {
                return Ok(*version);
            }
        }
        // every version succeeds another; the versions form a cycle
        Ok(versions[versions.len() - 1])
    }

    fn modify(&self, file: &Name) -> Fallible<Option<FileChange>> {
        let path = match self.resolver.resolve_path(file)? {
            Some(path) => path,
            None => return Ok(None),
        };
        let data = self.graph.content_of(self.query, file)?;
        Ok(Some(FileChange::Modify {
            mode: self.mode_of(file),
            path,
            data,
        }))
    }

    fn mode_of(&self, name: &Name) -> Mode {
        let category = name.category();
        if category == SYMLINK {
            Mode::Symlink
        } else if self.config.executable_categories.iter().any(|c| c == category) {
            Mode::Executable
        } else {
            Mode::Regular
        }
    }

    fn message(&self, task: &Task) -> String {
        let mut message = match task.synopsis() {
            Some(synopsis) => synopsis.to_string(),
            None => task.name().name().to_string(),
        };
        if let Some(description) = task.description() {
            message.push_str("\n\n");
            message.push_str(description);
        }
        message.push_str(&format!("\n\n{}: {}\n", self.config.trailer, task.name()));
        message
    }

    fn identity(&self, login: &str, when: Timestamp) -> Identity {
        let author = self.config.author(login);
        Identity {
            name: author.name,
            email: author.email,
            when,
        }
    }

    /// The project's own owner and creation time
    fn project_identity(&self) -> Identity {
        let root = self.graph.root();
        let attributes = self.graph.attributes();
        let attribute = |key: &str| {
            attributes
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let login = attribute("owner").unwrap_or_else(|| {
            warn!("{} has no owner", root);
            "unknown"
        });
        let when = match attribute("create_time").map(Timestamp::parse) {
            Some(Ok(when)) => when,
            Some(Err(e)) => {
                warn!("{}: ignoring create_time: {}", root, e);
                Timestamp::epoch()
            }
            None => {
                warn!("{} has no create_time", root);
                Timestamp::epoch()
            }
        };
        self.identity(login, when)
    }
}
