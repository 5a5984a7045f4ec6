//! Defines the [`Post`] and [`Source`] types, and the logic for discovering
//! source documents on disk. See [`Post::to_value`] for how posts are
//! converted into template values.

use gtmpl::Value;
use std::collections::HashMap;
use std::fs::read_dir;
use std::path::{Path, PathBuf};
use tracing::error;

/// A source document discovered in the posts directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    /// The logical name of the document: its file name up to the first `.`.
    pub name: String,

    /// The full path to the document on disk.
    pub path: PathBuf,
}

impl Source {
    /// The output path for this document, relative to the output directory
    /// (e.g., `posts/hello.html`). This is what ends up as [`Post::path`].
    pub fn relative_output_path(&self) -> String {
        format!("posts/{}.html", self.name)
    }

    /// The link to this document's page relative to the index, with the name
    /// percent-encoded so any file name makes a valid `href`.
    pub fn relative_url(&self) -> String {
        page_url(&self.name)
    }
}

fn page_url(name: &str) -> String {
    format!("posts/{}.html", urlencoding::encode(name))
}

/// Represents a page that was successfully written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    /// The path of the rendered page relative to the output directory.
    pub path: String,

    /// The display title. This is the source document's logical name.
    pub title: String,

    /// The source document the page was rendered from.
    pub source: PathBuf,
}

impl Post {
    /// The percent-encoded link to the page, relative to the index.
    pub fn url(&self) -> String {
        page_url(&self.title)
    }

    /// Converts a [`Post`] into a template [`Value`]. The result is a
    /// [`Value::Object`] with the fields `Path` (the percent-encoded link,
    /// see [`Post::url`]) and `Title` (raw, so templates should pipe it
    /// through `html`), e.g.
    /// `{{range .}}<a href="{{.Path}}">{{.Title | html}}</a>{{end}}`.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Path".to_owned(), Value::String(self.url()));
        m.insert("Title".to_owned(), Value::String(self.title.clone()));
        Value::Object(m)
    }
}

impl From<&Post> for Value {
    fn from(post: &Post) -> Value {
        post.to_value()
    }
}

/// Lists the documents in `dir`, sorted by file name. Subdirectories and
/// files without a usable name (e.g., `.gitignore`) are skipped.
///
/// An unreadable directory is not an error: it is logged and treated as
/// empty, so the build still produces an (empty) index.
pub fn list_sources(dir: &Path) -> Vec<Source> {
    let entries = match read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            error!("Reading posts directory '{}': {}", dir.display(), err);
            return Vec::new();
        }
    };

    let mut sources = Vec::new();
    for result in entries {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                error!("Reading posts directory '{}': {}", dir.display(), err);
                continue;
            }
        };
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }

        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        match logical_name(&file_name) {
            Some(name) => sources.push(Source {
                name: name.to_owned(),
                path: entry.path(),
            }),
            None => continue,
        }
    }

    sources.sort_by(|a, b| a.path.cmp(&b.path));
    sources
}

/// Cuts `file_name` at its first `.`. Returns `None` when nothing is left.
fn logical_name(file_name: &str) -> Option<&str> {
    match file_name.split('.').next() {
        Some(name) if !name.is_empty() => Some(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_logical_name() {
        assert_eq!(logical_name("hello.md"), Some("hello"));
        assert_eq!(logical_name("archive.tar.md"), Some("archive"));
        assert_eq!(logical_name("README"), Some("README"));
        assert_eq!(logical_name(".gitignore"), None);
    }

    #[test]
    fn test_list_sources_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "b").unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::create_dir(dir.path().join("drafts")).unwrap();

        let names: Vec<String> = list_sources(dir.path())
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_list_sources_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_sources(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn test_post_url_is_percent_encoded() {
        let post = Post {
            path: String::from("posts/<i>x & y.html"),
            title: String::from("<i>x & y"),
            source: PathBuf::from("posts/<i>x & y.md"),
        };
        assert_eq!(post.url(), "posts/%3Ci%3Ex%20%26%20y.html");
        match post.to_value() {
            Value::Object(m) => assert!(matches!(
                m.get("Path"),
                Some(Value::String(p)) if p == "posts/%3Ci%3Ex%20%26%20y.html"
            )),
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_post_to_value() {
        let post = Post {
            path: String::from("posts/a.html"),
            title: String::from("a"),
            source: PathBuf::from("posts/a.md"),
        };
        match post.to_value() {
            Value::Object(m) => {
                assert_eq!(m.len(), 2);
                assert!(matches!(m.get("Path"), Some(Value::String(p)) if p == "posts/a.html"));
                assert!(matches!(m.get("Title"), Some(Value::String(t)) if t == "a"));
            }
            _ => panic!("expected an object"),
        }
    }
}
