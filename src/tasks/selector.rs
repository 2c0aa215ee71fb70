use super::error::Error;
use super::task::Task;
use crate::name::Name;
use crate::query::QueryService;
use failure::Fallible;
use log::{debug, warn};
use std::collections::HashSet;

/// The attribute linking a project version to the baseline built for it.
const RELEASE: &str = "release";

/// Choose a project's baseline among `candidates`, each given with its release attribute.
///
/// A sole candidate is chosen outright.  Among several, the one candidate whose release
/// matches the project's is chosen; anything else is ambiguous.  No candidates means the
/// project has no baseline.
pub fn pick_baseline(
    project: &Name,
    release: Option<&str>,
    candidates: &[(Name, Option<String>)],
) -> Result<Option<Name>, Error> {
    match candidates {
        [] => Ok(None),
        [(only, _)] => Ok(Some(only.clone())),
        _ => {
            let matching: Vec<&Name> = candidates
                .iter()
                .filter(|(_, r)| release.is_some() && r.as_deref() == release)
                .map(|(n, _)| n)
                .collect();
            match matching.as_slice() {
                [only] => Ok(Some((*only).clone())),
                _ => Err(Error::AmbiguousBaseline {
                    project: project.clone(),
                    candidates: candidates.iter().map(|(n, _)| n.clone()).collect(),
                }),
            }
        }
    }
}

/// The tasks of `tasks` that are not in `parent_tasks`, in their original order and without
/// duplicates.
pub fn new_tasks(tasks: &[Name], parent_tasks: &[Name]) -> Vec<Name> {
    let mut seen: HashSet<&Name> = parent_tasks.iter().collect();
    tasks
        .iter()
        .filter(|t| seen.insert(*t))
        .cloned()
        .collect()
}

/// Order tasks by effective time, keeping the original order among ties.  Tasks with no usable
/// time sort first.
pub fn order_tasks(tasks: &mut [Task]) {
    tasks.sort_by_cached_key(|t| {
        let time = t.effective_time();
        if time.is_none() {
            warn!("task {} has no completion or creation time", t.name());
        }
        time
    });
}

/// A TaskSelector finds the tasks a project version introduced over its parent.
pub struct TaskSelector<'a, Q: QueryService + ?Sized> {
    query: &'a Q,
}

impl<'a, Q: QueryService + ?Sized> TaskSelector<'a, Q> {
    pub fn new(query: &'a Q) -> TaskSelector<'a, Q> {
        TaskSelector { query }
    }

    /// Resolve the baseline of `project`.
    pub fn baseline_of(&self, project: &Name) -> Fallible<Option<Name>> {
        let release = self.query.attribute(project, RELEASE)?;
        let mut candidates = vec![];
        for baseline in self.query.baselines_of(project)? {
            let r = self.query.attribute(&baseline, RELEASE)?;
            candidates.push((baseline, r));
        }
        Ok(pick_baseline(project, release.as_deref(), &candidates)?)
    }

    /// Resolve the project `project` was derived from: its baseline project, or failing that
    /// its first version-predecessor.
    pub fn parent_of(&self, project: &Name) -> Fallible<Option<Name>> {
        if let Some(parent) = self.query.is_baseline_project_of(project)? {
            return Ok(Some(parent));
        }
        Ok(self.query.predecessors(project)?.into_iter().next())
    }

    /// The tasks in the baseline of `project`, in retrieval order.
    pub fn tasks_of(&self, project: &Name) -> Fallible<Vec<Name>> {
        match self.baseline_of(project)? {
            Some(baseline) => self.query.baseline_tasks(&baseline),
            None => {
                warn!("{} has no baseline", project);
                Ok(vec![])
            }
        }
    }

    /// The tasks in the baseline of `project` that are not in its parent's baseline.
    pub fn select(&self, project: &Name) -> Fallible<Vec<Name>> {
        let tasks = self.tasks_of(project)?;
        let parent_tasks = match self.parent_of(project)? {
            Some(parent) => {
                debug!("{} derives from {}", project, parent);
                self.tasks_of(&parent)?
            }
            None => {
                debug!("{} is the first version in its history", project);
                vec![]
            }
        };
        Ok(new_tasks(&tasks, &parent_tasks))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repo::Repository;
    use crate::store::{Attributes, ObjectRecord};

    fn n(text: &str) -> Name {
        Name::parse(text).unwrap()
    }

    fn t(id: u32) -> Name {
        n(&format!("{}-1:task:probtrac", id))
    }

    #[test]
    fn pick_sole_baseline() {
        let p = n("p-1:project:1");
        let b = n("b-1:baseline:1");
        assert_eq!(pick_baseline(&p, None, &[(b.clone(), None)]), Ok(Some(b)));
        assert_eq!(pick_baseline(&p, Some("1.0"), &[]), Ok(None));
    }

    #[test]
    fn pick_baseline_by_release() {
        let p = n("p-1:project:1");
        let candidates = vec![
            (n("b-1:baseline:1"), Some("1.0".to_string())),
            (n("b-2:baseline:1"), Some("2.0".to_string())),
            (n("b-3:baseline:1"), None),
        ];
        assert_eq!(
            pick_baseline(&p, Some("2.0"), &candidates),
            Ok(Some(n("b-2:baseline:1")))
        );
    }

    #[test]
    fn pick_baseline_ambiguous() {
        let p = n("p-1:project:1");
        let candidates = vec![
            (n("b-1:baseline:1"), Some("1.0".to_string())),
            (n("b-2:baseline:1"), Some("1.0".to_string())),
        ];
        let expected = Err(Error::AmbiguousBaseline {
            project: p.clone(),
            candidates: vec![n("b-1:baseline:1"), n("b-2:baseline:1")],
        });
        assert_eq!(pick_baseline(&p, Some("1.0"), &candidates), expected);
        assert_eq!(pick_baseline(&p, Some("3.0"), &candidates), expected);
        assert_eq!(pick_baseline(&p, None, &candidates), expected);
    }

    #[test]
    fn new_tasks_is_ordered_difference() {
        assert_eq!(
            new_tasks(&[t(3), t(1), t(2), t(1)], &[t(2), t(9)]),
            vec![t(3), t(1)]
        );
        assert_eq!(new_tasks(&[t(3), t(1)], &[]), vec![t(3), t(1)]);
    }

    fn timed(id: u32, completed: Option<&str>, created: Option<&str>) -> Task {
        let mut attributes = Attributes::new();
        if let Some(c) = completed {
            attributes.insert("completion_date".into(), c.into());
        }
        if let Some(c) = created {
            attributes.insert("create_time".into(), c.into());
        }
        Task::new(t(id), attributes, vec![])
    }

    #[test]
    fn order_by_effective_time() {
        let mut tasks = vec![
            timed(1, Some("2012-03-01T00:00:00Z"), None),
            timed(2, None, Some("2012-01-01T00:00:00Z")),
            timed(3, Some("2012-02-01T00:00:00Z"), Some("2011-01-01T00:00:00Z")),
            timed(4, Some("2012-01-01T00:00:00Z"), None),
            timed(5, None, None),
        ];
        order_tasks(&mut tasks);
        let ids: Vec<u64> = tasks.iter().map(|t| t.id().unwrap()).collect();
        // 2 and 4 tie, and keep their original order
        assert_eq!(ids, vec![5, 2, 4, 3, 1]);

        let times: Vec<_> = tasks.iter().map(|t| t.effective_time()).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    fn history() -> Repository {
        let p1 = n("p-1:project:1");
        let p2 = n("p-2:project:1");
        let mut repo = Repository::new();
        repo.insert(ObjectRecord::new(p1.clone()))
            .insert(ObjectRecord::new(p2.clone()).with_attribute("release", "2.0"))
            .add_baseline(&p1, &n("p_bl-1:baseline:1"), &[t(100), t(101)])
            .add_baseline(&p2, &n("p_bl-2:baseline:1"), &[t(100), t(101), t(102), t(103)]);
        repo
    }

    #[test]
    fn select_first_version() -> Fallible<()> {
        let repo = history();
        let selector = TaskSelector::new(&repo);
        assert_eq!(selector.select(&n("p-1:project:1"))?, vec![t(100), t(101)]);
        Ok(())
    }

    #[test]
    fn select_via_baseline_project() -> Fallible<()> {
        let mut repo = history();
        repo.set_baseline_project(&n("p-2:project:1"), &n("p-1:project:1"));
        let selector = TaskSelector::new(&repo);
        assert_eq!(selector.select(&n("p-2:project:1"))?, vec![t(102), t(103)]);
        Ok(())
    }

    #[test]
    fn select_via_predecessor() -> Fallible<()> {
        let mut repo = history();
        repo.add_successor(&n("p-1:project:1"), &n("p-2:project:1"));
        let selector = TaskSelector::new(&repo);
        assert_eq!(
            selector.parent_of(&n("p-2:project:1"))?,
            Some(n("p-1:project:1"))
        );
        assert_eq!(selector.select(&n("p-2:project:1"))?, vec![t(102), t(103)]);
        Ok(())
    }

    #[test]
    fn select_ambiguous_is_fatal() {
        let mut repo = history();
        repo.add_baseline(
            &n("p-2:project:1"),
            &n("p_bl-2b:baseline:1"),
            &[t(104)],
        );
        let selector = TaskSelector::new(&repo);
        let err = selector.select(&n("p-2:project:1")).unwrap_err();
        assert!(err.downcast_ref::<Error>().is_some());
    }
}
