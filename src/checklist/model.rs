//! Structured checklist document.
//!
//! The document is kept line by line so that rendering it back is byte-identical
//! to the input except for checkboxes flipped through [`Checklist::mark_done`].
//! Items are addressed by [`TaskId`] instead of by re-matching their text.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::parser::{extract_target, parse_checkbox};

/// Open/done state of a task item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Open => write!(f, "open"),
            TaskStatus::Done => write!(f, "done"),
        }
    }
}

/// Stable identity of a task item: its position among task lines plus a
/// digest of its description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId {
    pub ordinal: usize,
    pub digest: String,
}

impl TaskId {
    pub fn new(ordinal: usize, description: &str) -> Self {
        Self {
            ordinal,
            digest: description_digest(description),
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.digest.get(..8).unwrap_or(&self.digest);
        write!(f, "#{}:{}", self.ordinal + 1, short)
    }
}

/// Hex SHA-256 of a task description.
pub fn description_digest(description: &str) -> String {
    hex::encode(Sha256::digest(description.as_bytes()))
}

/// One checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: TaskId,
    pub description: String,
    /// First backtick-quoted token of the description
    pub target: Option<String>,
    pub status: TaskStatus,
}

impl TaskItem {
    pub fn is_open(&self) -> bool {
        self.status == TaskStatus::Open
    }
}

#[derive(Debug, Clone)]
struct TaskLine {
    /// Index into `Checklist::lines`
    line: usize,
    /// Byte range of the checkbox interior within that line
    box_span: Range<usize>,
    item: TaskItem,
}

/// A parsed checklist document.
#[derive(Debug, Clone, Default)]
pub struct Checklist {
    /// Source lines, each with its original terminator
    lines: Vec<String>,
    tasks: Vec<TaskLine>,
}

impl Checklist {
    /// Parse a markdown document. Never fails: lines that are not tasks are
    /// carried through untouched.
    pub fn parse(document: &str) -> Self {
        let mut lines = Vec::new();
        let mut tasks = Vec::new();

        for (index, raw) in document.split_inclusive('\n').enumerate() {
            let content = raw.trim_end_matches(['\n', '\r']);
            if let Some(checkbox) = parse_checkbox(content) {
                let ordinal = tasks.len();
                let description = checkbox.description.to_string();
                tasks.push(TaskLine {
                    line: index,
                    box_span: checkbox.box_span,
                    item: TaskItem {
                        id: TaskId::new(ordinal, &description),
                        target: extract_target(&description),
                        status: if checkbox.checked {
                            TaskStatus::Done
                        } else {
                            TaskStatus::Open
                        },
                        description,
                    },
                });
            }
            lines.push(raw.to_string());
        }

        Self { lines, tasks }
    }

    /// All items in document order.
    pub fn items(&self) -> impl Iterator<Item = &TaskItem> {
        self.tasks.iter().map(|t| &t.item)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The highest-priority open item.
    pub fn first_open(&self) -> Option<&TaskItem> {
        self.items().find(|item| item.is_open())
    }

    pub fn open_count(&self) -> usize {
        self.items().filter(|item| item.is_open()).count()
    }

    pub fn done_count(&self) -> usize {
        self.len() - self.open_count()
    }

    /// First target named anywhere in the checklist, open or done.
    pub fn main_artifact(&self) -> Option<String> {
        self.items().find_map(|item| item.target.clone())
    }

    /// Mark the identified item done.
    ///
    /// Looks first at the same ordinal, then at the first open item with the
    /// same description digest. Returns false when the item is no longer in
    /// the document.
    pub fn mark_done(&mut self, id: &TaskId) -> bool {
        let Some(index) = self.locate(id) else {
            return false;
        };

        let task = &mut self.tasks[index];
        if task.item.status == TaskStatus::Done {
            return true;
        }

        self.lines[task.line].replace_range(task.box_span.clone(), "x");
        task.box_span = task.box_span.start..task.box_span.start + 1;
        task.item.status = TaskStatus::Done;
        true
    }

    /// Serialize back to markdown.
    pub fn render(&self) -> String {
        self.lines.concat()
    }

    fn locate(&self, id: &TaskId) -> Option<usize> {
        if let Some(task) = self.tasks.get(id.ordinal)
            && task.item.id.digest == id.digest
        {
            return Some(id.ordinal);
        }
        self.tasks
            .iter()
            .position(|t| t.item.is_open() && t.item.id.digest == id.digest)
    }
}

impl fmt::Display for Checklist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
