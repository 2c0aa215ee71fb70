use super::error::Error;
use super::traits::ObjectStore;
use crate::name::Name;
use failure::Fallible;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Export `name` into `workdir`, retrying until the store verifies the archive or `attempts`
/// exports have been tried.  Returns the path of the verified archive.
pub fn fetch<S>(store: &S, name: &Name, workdir: &Path, attempts: usize) -> Fallible<PathBuf>
where
    S: ObjectStore + ?Sized,
{
    let archive = workdir.join(archive_file_name(name));

    let mut last_failure = String::from("no export attempted");
    for attempt in 1..=attempts {
        debug!("exporting {} (attempt {}/{})", name, attempt, attempts);
        match store.export(name, &archive) {
            Ok(()) => {
                if store.verify(&archive) {
                    return Ok(archive);
                }
                warn!(
                    "archive of {} failed verification (attempt {}/{})",
                    name, attempt, attempts
                );
                last_failure = "archive failed verification".to_string();
            }
            Err(e) => {
                warn!(
                    "export of {} failed (attempt {}/{}): {}",
                    name, attempt, attempts, e
                );
                last_failure = e.to_string();
            }
        }
    }

    Err(Error::ArchiveIntegrity(name.clone(), attempts, last_failure).into())
}

fn archive_file_name(name: &Name) -> String {
    format!("{}.archive", name.to_path_form().replace('/', "_"))
}
