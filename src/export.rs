//! Export of a single project version: its new tasks as commits, then the reconciliation
//! commit and its tag.

use crate::config::Config;
use crate::graph::ProjectGraph;
use crate::name::Name;
use crate::query::QueryService;
use crate::store::ObjectStore;
use crate::stream::{StreamWriter, Synthesizer};
use crate::tasks::{order_tasks, Task, TaskSelector};
use failure::Fallible;
use log::{debug, info};
use std::fs;
use std::io::Write;

/// Write the commits for `project` to `out`, returning the number of commits written.
///
/// When `from` is given, the first commit written builds on it.
pub fn export_project<R, W>(
    repo: &R,
    config: &Config,
    project: &Name,
    from: Option<String>,
    out: W,
) -> Fallible<usize>
where
    R: QueryService + ObjectStore + ?Sized,
    W: Write,
{
    let workdir = config
        .workdir()
        .join(project.to_path_form().replace('/', "_"));
    fs::create_dir_all(&workdir)?;

    let graph = ProjectGraph::load(repo, project, &workdir, config.fetch_attempts)?;

    let selected = TaskSelector::new(repo).select(project)?;
    let mut tasks = vec![];
    for name in selected.iter() {
        let task = Task::load(repo, name, &workdir, config.fetch_attempts)?;
        if task.touches(&graph) {
            tasks.push(task);
        } else {
            debug!("{}: task {} changes nothing in this project", project, name);
        }
    }
    order_tasks(&mut tasks);
    info!(
        "{}: {} new tasks, {} touching the project",
        project,
        selected.len(),
        tasks.len()
    );

    let synth = Synthesizer::new(repo, &graph, config);
    let mut writer = StreamWriter::new(out);
    let mut from = from;
    for task in tasks.iter() {
        writer.commit(&synth.task_commit(task, from.take())?)?;
    }
    writer.commit(&synth.baseline_commit(from.take())?)?;
    writer.tag(&synth.baseline_tag())?;

    info!("{}: wrote {} commits", project, writer.commits());
    Ok(writer.commits())
}
