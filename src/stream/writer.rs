use super::record::{Commit, Tag};
use failure::Fallible;
use log::debug;
use std::io::Write;

/// A StreamWriter writes whole records to an underlying writer.
pub struct StreamWriter<W: Write> {
    out: W,
    commits: usize,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(out: W) -> StreamWriter<W> {
        StreamWriter { out, commits: 0 }
    }

    pub fn commit(&mut self, commit: &Commit) -> Fallible<()> {
        let mut buf = vec![];
        commit.render(&mut buf);
        self.out.write_all(&buf)?;
        self.commits += 1;
        debug!(
            "wrote commit {} with {} changes",
            commit.mark.map_or_else(|| "(unmarked)".to_string(), |m| format!(":{}", m)),
            commit.changes.len()
        );
        Ok(())
    }

    pub fn tag(&mut self, tag: &Tag) -> Fallible<()> {
        let mut buf = vec![];
        tag.render(&mut buf);
        self.out.write_all(&buf)?;
        debug!("wrote tag {}", tag.name);
        Ok(())
    }

    /// The number of commits written so far
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
