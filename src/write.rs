use crate::convert::{Converter, Error as ConvertError};
use crate::post::{Post, Source};
use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Responsible for converting, templating, and writing HTML pages to disk
/// from [`Source`] documents.
pub struct Writer<'a> {
    /// The template for post pages. It's executed with an object holding
    /// `body` (the converted HTML fragment), `title` (unescaped), and `path`
    /// (the percent-encoded link to the page).
    pub posts_template: &'a Template,

    /// The template for the index page. It's executed with the array of
    /// written [`Post`]s as its root value.
    pub index_template: &'a Template,

    /// The directory in which the index page will be written. Post pages go
    /// in `{output_directory}/posts/`.
    pub output_directory: &'a Path,

    /// Turns each source document into the `body` fragment.
    pub converter: &'a dyn Converter,
}

impl Writer<'_> {
    /// Converts a single [`Source`], templates it, and writes it to
    /// `{output_directory}/posts/{name}.html`. The returned [`Post`] always
    /// refers to a file that was just written.
    pub fn write_post(&self, source: &Source) -> Result<Post> {
        info!("Generating post {}", source.name);
        let annotate = |err: Error| Error::Annotated(source.name.clone(), Box::new(err));

        let body = self
            .converter
            .convert(&source.path)
            .map_err(|err| annotate(Error::Convert(err)))?;

        let path = source.relative_output_path();
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("body".to_owned(), Value::String(body));
        m.insert("title".to_owned(), Value::String(source.name.clone()));
        m.insert("path".to_owned(), Value::String(source.relative_url()));

        render(
            self.posts_template,
            Value::Object(m),
            &self.output_directory.join(&path),
        )
        .map_err(annotate)?;

        Ok(Post {
            path,
            title: source.name.clone(),
            source: source.path.clone(),
        })
    }

    /// Writes every source in order, stopping at the first failure.
    pub fn write_posts(&self, sources: &[Source]) -> Result<Vec<Post>> {
        sources.iter().map(|source| self.write_post(source)).collect()
    }

    /// Renders the index template once with all of the `posts` and writes
    /// the result to `{output_directory}/index.html`. Returns the path of
    /// the written file.
    pub fn write_index(&self, posts: &[Post]) -> Result<PathBuf> {
        info!("Generating index.html");
        let file_path = self.output_directory.join("index.html");
        render(
            self.index_template,
            Value::Array(posts.iter().map(Value::from).collect()),
            &file_path,
        )?;
        Ok(file_path)
    }
}

/// Executes `template` against `value` and writes the output to `file_path`.
/// The page is rendered in memory first so a failed render never leaves a
/// truncated file behind.
fn render(template: &Template, value: Value, file_path: &Path) -> Result<()> {
    let mut buf: Vec<u8> = Vec::new();
    template.execute(&mut buf, &Context::from(value)?)?;
    std::fs::write(file_path, buf).map_err(|err| Error::Create {
        path: file_path.to_owned(),
        err,
    })
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// The converter failed on a source document.
    Convert(ConvertError),

    /// An error during templating.
    Template(String),

    /// An error creating or writing an output file.
    Create { path: PathBuf, err: io::Error },

    /// Wraps an error with the name of the post being written.
    Annotated(String, Box<Error>),
}

impl From<ConvertError> for Error {
    /// Converts a [`ConvertError`] into an [`Error`]. This allows us to use
    /// the `?` operator on [`Converter::convert`].
    fn from(err: ConvertError) -> Error {
        Error::Convert(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Convert(err) => err.fmt(f),
            Error::Template(err) => write!(f, "Executing template: {}", err),
            Error::Create { path, err } => {
                write!(f, "Creating file '{}': {}", path.display(), err)
            }
            Error::Annotated(name, err) => {
                write!(f, "Generating post '{}': {}", name, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Convert(err) => Some(err),
            Error::Template(_) => None,
            Error::Create { path: _, err } => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert;
    use pretty_assertions::assert_eq;

    struct Echo;

    impl Converter for Echo {
        fn convert(&self, source: &Path) -> convert::Result<String> {
            Ok(format!("<p>{}</p>", source.display()))
        }
    }

    fn template(text: &str) -> Template {
        let mut template = Template::default();
        template.parse(text).unwrap();
        template
    }

    #[test]
    fn test_write_post_substitutes_body() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("posts")).unwrap();
        let posts_template = template("<h1>{{.title}}</h1>{{.body}}");
        let index_template = template("");
        let writer = Writer {
            posts_template: &posts_template,
            index_template: &index_template,
            output_directory: dir.path(),
            converter: &Echo,
        };

        let post = writer.write_post(&Source {
            name: String::from("hello"),
            path: PathBuf::from("hello.md"),
        })?;

        assert_eq!(post.path, "posts/hello.html");
        assert_eq!(post.title, "hello");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("posts/hello.html")).unwrap(),
            "<h1>hello</h1><p>hello.md</p>"
        );
        Ok(())
    }

    #[test]
    fn test_write_index_lists_posts_in_order() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let posts_template = template("");
        let index_template =
            template(r#"{{range .}}<a href="{{.Path}}">{{.Title}}</a>{{end}}"#);
        let writer = Writer {
            posts_template: &posts_template,
            index_template: &index_template,
            output_directory: dir.path(),
            converter: &Echo,
        };

        let posts: Vec<Post> = ["b", "a"]
            .iter()
            .map(|name| Post {
                path: format!("posts/{}.html", name),
                title: name.to_string(),
                source: PathBuf::from(format!("{}.md", name)),
            })
            .collect();
        let file_path = writer.write_index(&posts)?;

        assert_eq!(file_path, dir.path().join("index.html"));
        assert_eq!(
            std::fs::read_to_string(file_path).unwrap(),
            r#"<a href="posts/b.html">b</a><a href="posts/a.html">a</a>"#
        );
        Ok(())
    }

    #[test]
    fn test_failed_render_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("posts")).unwrap();
        // `body` is a string, so looking up a field on it fails mid-render.
        let posts_template = template("<p>before</p>{{.body.missing}}");
        let index_template = template("");
        let writer = Writer {
            posts_template: &posts_template,
            index_template: &index_template,
            output_directory: dir.path(),
            converter: &Echo,
        };

        let result = writer.write_post(&Source {
            name: String::from("hello"),
            path: PathBuf::from("hello.md"),
        });
        match result {
            Err(Error::Annotated(_, err)) => assert!(matches!(*err, Error::Template(_))),
            other => panic!("expected a template error, got {:?}", other),
        }
        assert!(!dir.path().join("posts/hello.html").exists());
    }

    #[test]
    fn test_write_post_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let posts_template = template("{{.body}}");
        let index_template = template("");
        let writer = Writer {
            posts_template: &posts_template,
            index_template: &index_template,
            output_directory: &dir.path().join("missing"),
            converter: &Echo,
        };

        let result = writer.write_post(&Source {
            name: String::from("hello"),
            path: PathBuf::from("hello.md"),
        });
        match result {
            Err(Error::Annotated(name, err)) => {
                assert_eq!(name, "hello");
                assert!(matches!(*err, Error::Create { .. }));
            }
            other => panic!("expected a create error, got {:?}", other),
        }
    }
}
