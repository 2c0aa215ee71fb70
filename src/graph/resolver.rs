use super::graph::{Parent, ProjectGraph};
use crate::name::Name;
use crate::query::QueryService;
use failure::Fallible;
use log::debug;
use std::collections::HashSet;

/// The default bound on successor hops when looking for a bound version of an object.
pub const DEFAULT_MAX_SUCCESSOR_HOPS: usize = 20;

/// A PathResolver computes the path of an object within a project graph.
///
/// Exported snapshots often lag behind version creation: a freshly created version of a file
/// may not be bound into the project yet, even though a later version is.  When an object is
/// not bound, the resolver searches its version-successors for one that is, and uses that
/// version's container instead.
pub struct PathResolver<'a, Q: QueryService + ?Sized> {
    graph: &'a ProjectGraph,
    query: &'a Q,
    max_hops: usize,
}

impl<'a, Q: QueryService + ?Sized> PathResolver<'a, Q> {
    pub fn new(graph: &'a ProjectGraph, query: &'a Q) -> PathResolver<'a, Q> {
        PathResolver {
            graph,
            query,
            max_hops: DEFAULT_MAX_SUCCESSOR_HOPS,
        }
    }

    /// Set the bound on successor hops.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Resolve the path segments of `name`, from the root down to `name` itself.  Returns
    /// `None` if no chain of containers reaches the root.  Errors come only from the
    /// repository queries made along the way.
    pub fn resolve(&self, name: &Name) -> Fallible<Option<Vec<String>>> {
        let mut segments = vec![];
        let mut visited = HashSet::new();
        let mut current = name.clone();

        loop {
            if !visited.insert(current.clone()) {
                debug!("containment cycle at {} resolving {}", current, name);
                return Ok(None);
            }
            segments.push(current.name().to_string());

            match self.container(&current)? {
                Some(Parent::Root) => break,
                Some(Parent::Object(parent)) => current = parent,
                None => return Ok(None),
            }
        }

        segments.reverse();
        Ok(Some(segments))
    }

    /// Resolve the `/`-separated path of `name`.
    pub fn resolve_path(&self, name: &Name) -> Fallible<Option<String>> {
        Ok(self.resolve(name)?.map(|segments| segments.join("/")))
    }

    /// Find the container of `name`, falling back to a bound successor version.
    fn container(&self, name: &Name) -> Fallible<Option<Parent>> {
        if let Some(parent) = self.graph.parent(name) {
            return Ok(Some(parent.clone()));
        }

        let graph = self.graph;
        let found = successor_search(self.query, name, self.max_hops, |n| {
            graph.parent(n).is_some()
        })?;
        Ok(match found {
            Some(bound) => {
                debug!("{} is not bound; using successor {}", name, bound);
                graph.parent(&bound).cloned()
            }
            None => None,
        })
    }
}

/// Search breadth-first along version-successor edges from `start`, for at most `max_hops`
/// hops, returning the nearest version accepted by `accept`.  `start` itself is not
/// considered.
pub fn successor_search<Q, F>(
    query: &Q,
    start: &Name,
    max_hops: usize,
    mut accept: F,
) -> Fallible<Option<Name>>
where
    Q: QueryService + ?Sized,
    F: FnMut(&Name) -> bool,
{
    let mut seen = HashSet::new();
    seen.insert(start.clone());
    let mut frontier = vec![start.clone()];

    for _ in 0..max_hops {
        let mut next = vec![];
        for name in frontier.iter() {
            for successor in query.successors(name)? {
                if !seen.insert(successor.clone()) {
                    continue;
                }
                if accept(&successor) {
                    return Ok(Some(successor));
                }
                next.push(successor);
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    Ok(None)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repo::Repository;
    use crate::store::{Attributes, ObjectRecord};

    fn n(text: &str) -> Name {
        Name::parse(text).unwrap()
    }

    /// proj
    ///   src/
    ///     a.txt (version 3 bound)
    ///     lib/ (version 2 bound)
    ///       b.txt
    fn graph() -> ProjectGraph {
        let proj = n("proj-1:project:1");
        ProjectGraph::build(
            proj.clone(),
            Attributes::new(),
            vec![ObjectRecord::new(proj.clone())
                .with_binding(n("src-1:dir:1"), proj.clone())
                .with_binding(n("a.txt-3:ascii:1"), n("src-1:dir:1"))
                .with_binding(n("lib-2:dir:1"), n("src-1:dir:1"))
                .with_binding(n("b.txt-1:ascii:1"), n("lib-2:dir:1"))],
        )
    }

    fn chain(repo: &mut Repository, base: &str, category: &str, from: usize, to: usize) {
        for v in from..to {
            repo.add_successor(
                &n(&format!("{}-{}:{}:1", base, v, category)),
                &n(&format!("{}-{}:{}:1", base, v + 1, category)),
            );
        }
    }

    #[test]
    fn resolve_bound() -> Fallible<()> {
        let graph = graph();
        let repo = Repository::new();
        let resolver = PathResolver::new(&graph, &repo);

        assert_eq!(
            resolver.resolve_path(&n("b.txt-1:ascii:1"))?,
            Some("src/lib/b.txt".to_string())
        );
        assert_eq!(
            resolver.resolve(&n("src-1:dir:1"))?,
            Some(vec!["src".to_string()])
        );
        Ok(())
    }

    #[test]
    fn resolve_via_successor() -> Fallible<()> {
        let graph = graph();
        let mut repo = Repository::new();
        chain(&mut repo, "a.txt", "ascii", 1, 3);
        let resolver = PathResolver::new(&graph, &repo);

        assert_eq!(
            resolver.resolve_path(&n("a.txt-1:ascii:1"))?,
            Some("src/a.txt".to_string())
        );
        Ok(())
    }

    #[test]
    fn resolve_unbound_ancestor_via_successor() -> Fallible<()> {
        // a new file, bound into an old version of lib/
        let proj = n("proj-1:project:1");
        let graph = ProjectGraph::build(
            proj.clone(),
            Attributes::new(),
            vec![ObjectRecord::new(proj.clone())
                .with_binding(n("src-1:dir:1"), proj.clone())
                .with_binding(n("lib-2:dir:1"), n("src-1:dir:1"))
                .with_binding(n("c.txt-1:ascii:1"), n("lib-1:dir:1"))],
        );
        let mut repo = Repository::new();
        chain(&mut repo, "lib", "dir", 1, 2);
        let resolver = PathResolver::new(&graph, &repo);

        assert_eq!(
            resolver.resolve_path(&n("c.txt-1:ascii:1"))?,
            Some("src/lib/c.txt".to_string())
        );
        Ok(())
    }

    #[test]
    fn successor_chain_too_long() -> Fallible<()> {
        let proj = n("proj-1:project:1");
        let graph = ProjectGraph::build(
            proj.clone(),
            Attributes::new(),
            vec![ObjectRecord::new(proj.clone()).with_binding(n("far-30:ascii:1"), proj.clone())],
        );
        let mut repo = Repository::new();
        chain(&mut repo, "far", "ascii", 1, 30);

        let resolver = PathResolver::new(&graph, &repo);
        assert_eq!(resolver.resolve(&n("far-1:ascii:1"))?, None);
        assert_eq!(
            resolver.resolve_path(&n("far-10:ascii:1"))?,
            Some("far".to_string())
        );

        let resolver = PathResolver::new(&graph, &repo).with_max_hops(29);
        assert_eq!(
            resolver.resolve_path(&n("far-1:ascii:1"))?,
            Some("far".to_string())
        );
        Ok(())
    }

    #[test]
    fn dead_end() -> Fallible<()> {
        let graph = graph();
        let mut repo = Repository::new();
        repo.insert(ObjectRecord::new(n("orphan-1:ascii:1")));
        let resolver = PathResolver::new(&graph, &repo);

        assert_eq!(resolver.resolve(&n("orphan-1:ascii:1"))?, None);
        Ok(())
    }

    #[test]
    fn successor_cycle_terminates() -> Fallible<()> {
        let graph = graph();
        let mut repo = Repository::new();
        repo.add_successor(&n("x-1:ascii:1"), &n("x-2:ascii:1"))
            .add_successor(&n("x-2:ascii:1"), &n("x-1:ascii:1"));
        let resolver = PathResolver::new(&graph, &repo);

        assert_eq!(resolver.resolve(&n("x-1:ascii:1"))?, None);
        Ok(())
    }

    #[test]
    fn containment_cycle_terminates() -> Fallible<()> {
        let proj = n("proj-1:project:1");
        let graph = ProjectGraph::build(
            proj.clone(),
            Attributes::new(),
            vec![ObjectRecord::new(proj.clone())
                .with_binding(n("a-1:dir:1"), n("b-1:dir:1"))
                .with_binding(n("b-1:dir:1"), n("a-1:dir:1"))
                .with_binding(n("f-1:ascii:1"), n("a-1:dir:1"))],
        );
        let repo = Repository::new();
        let resolver = PathResolver::new(&graph, &repo);

        assert_eq!(resolver.resolve(&n("f-1:ascii:1"))?, None);
        Ok(())
    }

    #[test]
    fn resolve_is_idempotent() -> Fallible<()> {
        let graph = graph();
        let mut repo = Repository::new();
        chain(&mut repo, "a.txt", "ascii", 1, 3);
        let resolver = PathResolver::new(&graph, &repo);

        let first = resolver.resolve(&n("a.txt-2:ascii:1"))?;
        let second = resolver.resolve(&n("a.txt-2:ascii:1"))?;
        assert!(first.is_some());
        assert_eq!(first, second);
        Ok(())
    }
}
