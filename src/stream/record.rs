use crate::timestamp::Timestamp;
use std::fmt;

/// The file mode a path is written with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Symlink,
    Executable,
    Regular,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Symlink => "120000",
            Mode::Executable => "100755",
            Mode::Regular => "100644",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The author of a commit or tag, and when it was made.
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub when: Timestamp,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} <{}> {}", self.name, self.email, self.when)
    }
}

/// One line of a commit body.
#[derive(Clone, Debug, PartialEq)]
pub enum FileChange {
    /// Remove the file at this path
    Delete(String),

    /// Write a file with inline content
    Modify {
        mode: Mode,
        path: String,
        data: Vec<u8>,
    },

    /// Clear the entire tree
    DeleteAll,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Commit {
    pub branch: String,
    pub mark: Option<u64>,
    pub committer: Identity,
    pub message: String,

    /// The commit this one builds on, when not simply the branch tip
    pub from: Option<String>,

    pub changes: Vec<FileChange>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
    pub name: String,
    pub from: String,
    pub tagger: Identity,
    pub message: String,
}

/// Append `data <len>` and the payload, followed by a newline.
fn render_data(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(format!("data {}\n", data.len()).as_bytes());
    out.extend_from_slice(data);
    out.push(b'\n');
}

fn render_line(out: &mut Vec<u8>, line: fmt::Arguments) {
    out.extend_from_slice(line.to_string().as_bytes());
    out.push(b'\n');
}

impl Commit {
    /// Render the complete record, terminated by a blank line.
    pub(super) fn render(&self, out: &mut Vec<u8>) {
        render_line(out, format_args!("commit {}", self.branch));
        if let Some(mark) = self.mark {
            render_line(out, format_args!("mark :{}", mark));
        }
        render_line(out, format_args!("committer {}", self.committer));
        render_data(out, self.message.as_bytes());
        if let Some(ref from) = self.from {
            render_line(out, format_args!("from {}", from));
        }
        for change in self.changes.iter() {
            match change {
                FileChange::Delete(path) => render_line(out, format_args!("D {}", path)),
                FileChange::Modify { mode, path, data } => {
                    render_line(out, format_args!("M {} inline {}", mode, path));
                    render_data(out, data);
                }
                FileChange::DeleteAll => render_line(out, format_args!("deleteall")),
            }
        }
        out.push(b'\n');
    }
}

impl Tag {
    pub(super) fn render(&self, out: &mut Vec<u8>) {
        render_line(out, format_args!("tag {}", self.name));
        render_line(out, format_args!("from {}", self.from));
        render_line(out, format_args!("tagger {}", self.tagger));
        render_data(out, self.message.as_bytes());
    }
}
