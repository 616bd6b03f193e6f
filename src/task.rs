//! Task file loading.
//!
//! A task file is XML:
//!
//! ```xml
//! <config>
//!   <repository id="example">
//!     <baseurl>https://example.org/oai</baseurl>
//!     <metadataprefix>oai_dc</metadataprefix>
//!     <recordpath>out/example</recordpath>
//!     <output-set name="theses">
//!       <id>oai:example.org:1</id>
//!     </output-set>
//!   </repository>
//! </config>
//! ```

use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::{OutputSet, RepositoryTask};

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("No config file \"{}\"", .path.display())]
    NotFound { path: PathBuf },

    #[error("Cannot read config file \"{}\": {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid task file: {0}")]
    Parse(#[from] quick_xml::DeError),

    #[error("Duplicate repository \"{0}\"")]
    DuplicateRepository(String),

    #[error("Duplicate output set \"{set}\" in repository \"{repository}\"")]
    DuplicateSet { repository: String, set: String },
}

#[derive(Debug, Deserialize)]
struct TaskFile {
    #[serde(rename = "repository", default)]
    repositories: Vec<RepositoryEntry>,
}

#[derive(Debug, Deserialize)]
struct RepositoryEntry {
    #[serde(rename = "@id")]
    id: String,
    #[serde(default)]
    baseurl: Option<String>,
    #[serde(default)]
    metadataprefix: Option<String>,
    #[serde(default)]
    recordpath: Option<String>,
    #[serde(rename = "output-set", default)]
    sets: Vec<SetEntry>,
}

#[derive(Debug, Deserialize)]
struct SetEntry {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "id", default)]
    ids: Vec<String>,
}

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl RepositoryEntry {
    fn into_task(self) -> Result<RepositoryTask, TaskError> {
        let mut task = RepositoryTask::new(
            self.id.trim(),
            text(self.baseurl),
            text(self.metadataprefix),
            text(self.recordpath),
        );

        let mut seen = HashSet::new();
        for set in self.sets {
            let name = set.name.trim().to_string();
            if !seen.insert(name.clone()) {
                return Err(TaskError::DuplicateSet {
                    repository: task.name.clone(),
                    set: name,
                });
            }
            let ids = set
                .ids
                .iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty());
            task.sets.push(OutputSet::new(name, ids));
        }
        Ok(task)
    }
}

/// Parses a task file's contents into repository tasks, in file order.
pub fn parse_tasks(xml: &str) -> Result<Vec<RepositoryTask>, TaskError> {
    let file: TaskFile = quick_xml::de::from_str(xml)?;

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(file.repositories.len());
    for entry in file.repositories {
        let task = entry.into_task()?;
        if !seen.insert(task.name.clone()) {
            return Err(TaskError::DuplicateRepository(task.name));
        }
        tasks.push(task);
    }
    Ok(tasks)
}

/// Reads and parses the task file at `path`.
pub fn load_tasks(path: &Path) -> Result<Vec<RepositoryTask>, TaskError> {
    if !path.exists() {
        return Err(TaskError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let xml = std::fs::read_to_string(path).map_err(|source| TaskError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tasks(&xml)
}

/// Tasks kept by [`select_repositories`], plus what was left out.
#[derive(Debug, Default)]
pub struct Selection {
    pub tasks: Vec<RepositoryTask>,

    /// Repositories in the file that were not requested
    pub skipped: Vec<String>,

    /// Requested repositories that the file does not define
    pub missing: Vec<String>,
}

/// Keeps only the requested repositories; `None` keeps all of them.
pub fn select_repositories(
    tasks: Vec<RepositoryTask>,
    wanted: Option<&BTreeSet<String>>,
) -> Selection {
    let Some(wanted) = wanted else {
        return Selection {
            tasks,
            ..Selection::default()
        };
    };

    let mut selection = Selection::default();
    for task in tasks {
        if wanted.contains(&task.name) {
            selection.tasks.push(task);
        } else {
            selection.skipped.push(task.name);
        }
    }
    selection.missing = wanted
        .iter()
        .filter(|name| !selection.tasks.iter().any(|t| &t.name == *name))
        .cloned()
        .collect();
    selection
}
