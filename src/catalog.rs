use crate::error::QuizError;
use std::fs;
use std::path::{Path, PathBuf};

pub const TOPIC_EXTENSIONS: [&str; 2] = ["txt", "md"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub topics: Vec<Topic>,
}

/// Sections and their topic files, in filesystem lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicCatalog {
    sections: Vec<Section>,
}

/// `network_security` -> `network security`, `access_control.txt` -> `access control`.
pub fn display_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .replace('_', " ")
}

fn is_topic_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| TOPIC_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, QuizError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    Ok(entries)
}

impl TopicCatalog {
    pub fn load(root: &Path) -> Result<Self, QuizError> {
        if !root.is_dir() {
            return Err(QuizError::Content(format!(
                "Content directory not found at: {}",
                root.display()
            )));
        }

        let mut sections = Vec::new();
        for section_path in sorted_entries(root)? {
            if !section_path.is_dir() {
                continue;
            }

            let topics = sorted_entries(&section_path)?
                .into_iter()
                .filter(|path| is_topic_file(path))
                .map(|path| Topic {
                    name: display_name(&path),
                    path,
                })
                .collect();

            sections.push(Section {
                name: section_path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .replace('_', " "),
                topics,
            });
        }

        crate::logger::log(&format!(
            "Loaded {} sections from {}",
            sections.len(),
            root.display()
        ));

        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn topic_names(&self, section: &str) -> Vec<&str> {
        self.section(section)
            .map(|s| s.topics.iter().map(|t| t.name.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn topic_path(&self, section: &str, topic: &str) -> Option<&Path> {
        self.section(section)?
            .topics
            .iter()
            .find(|t| t.name == topic)
            .map(|t| t.path.as_path())
    }

    pub fn read_topic(&self, section: &str, topic: &str) -> Result<String, QuizError> {
        let path = self.topic_path(section, topic).ok_or_else(|| {
            QuizError::InvalidInput(format!("Unknown topic '{}' in section '{}'", topic, section))
        })?;
        Ok(fs::read_to_string(path)?)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
