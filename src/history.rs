//! Export of a sequence of project versions.
//!
//! Project versions are independent of one another, so they are exported concurrently, each
//! into its own in-memory segment.  The segments are then written out in the order the
//! versions were given, which restores the history's order.

use crate::config::Config;
use crate::export::export_project;
use crate::name::Name;
use crate::query::QueryService;
use crate::store::ObjectStore;
use failure::{err_msg, Fallible};
use log::{debug, info};
use std::io::Write;
use std::thread;

/// Export `projects`, oldest first, to `out`, returning the number of commits written.
///
/// Up to `config.threads` projects are exported at once.  If any project fails, nothing is
/// written and the error of the earliest failing project is returned.
pub fn export_history<R, W>(repo: &R, config: &Config, projects: &[Name], mut out: W) -> Fallible<usize>
where
    R: QueryService + ObjectStore + ?Sized,
    W: Write,
{
    let mut segments = Vec::with_capacity(projects.len());
    let mut commits = 0;

    for (chunk_index, chunk) in projects.chunks(config.threads.max(1)).enumerate() {
        let results: Vec<thread::Result<Fallible<(Vec<u8>, usize)>>> = thread::scope(|s| {
            let workers: Vec<_> = chunk
                .iter()
                .enumerate()
                .map(|(i, project)| {
                    // only the first commit of the whole run builds on the update point
                    let from = if chunk_index == 0 && i == 0 {
                        config.from.clone()
                    } else {
                        None
                    };
                    s.spawn(move || -> Fallible<(Vec<u8>, usize)> {
                        let mut segment = vec![];
                        let n = export_project(repo, config, project, from, &mut segment)?;
                        Ok((segment, n))
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join()).collect()
        });

        for (project, result) in chunk.iter().zip(results) {
            match result {
                Ok(Ok((segment, n))) => {
                    debug!("{}: segment of {} bytes", project, segment.len());
                    segments.push(segment);
                    commits += n;
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => return Err(err_msg(format!("exporting {} panicked", project))),
            }
        }
    }

    for segment in segments.iter() {
        out.write_all(segment)?;
    }
    out.flush()?;
    info!("exported {} projects in {} commits", projects.len(), commits);
    Ok(commits)
}
