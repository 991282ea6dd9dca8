//! Content-creation scaffolding: the write-side counterpart of the scanner's
//! naming contract. Given a title it computes a slug, checks for on-disk
//! collisions, and appends a numeric suffix (`-1`, `-2`, …) until the name is
//! free. This is what keeps slugs unique enough for the resolver's
//! first-match suffix lookup to behave in practice.

use crate::config::{Config, DirLayout};
use crate::slug;
use chrono::Local;
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Serialize)]
struct PageHeader<'a> {
    title: &'a str,
    date: &'a str,
}

#[derive(Serialize)]
struct PostHeader<'a> {
    title: &'a str,
    date: &'a str,
    tags: Vec<String>,
}

/// Creates a new top-level page (`<slug>.md` under the content root) with a
/// default front-matter header, returning the created file's path.
pub fn create_page(config: &Config, title: &str) -> Result<PathBuf> {
    create_page_dated(config, title, &today())
}

/// Creates a new post directory (plus its empty `assets/` subdirectory) and
/// content file, returning the content file's path. The directory name is
/// derived from `date` and the slug per the configured layout, so the scanner
/// will rediscover the post on its next walk.
pub fn create_post(config: &Config, title: &str) -> Result<PathBuf> {
    create_post_dated(config, title, &today())
}

fn create_page_dated(config: &Config, title: &str, date: &str) -> Result<PathBuf> {
    let base = normalized(title)?;
    let mut slug = base.clone();
    let mut i = 0;
    while config
        .content_directory
        .join(format!("{}.md", slug))
        .exists()
    {
        i += 1;
        slug = format!("{}-{}", base, i);
    }

    let path = config.content_directory.join(format!("{}.md", slug));
    let header = serde_yaml::to_string(&PageHeader { title, date })?;
    std::fs::write(&path, format!("{}\n", header))?;
    Ok(path)
}

fn create_post_dated(config: &Config, title: &str, date: &str) -> Result<PathBuf> {
    let base = normalized(title)?;
    let mut slug = base.clone();
    let mut i = 0;
    loop {
        let dir = config
            .content_directory
            .join(post_dir_name(config.layout, date, &slug));
        if !dir.exists() {
            std::fs::create_dir_all(dir.join("assets"))?;
            let path = dir.join(format!("{}.md", slug));
            let header = serde_yaml::to_string(&PostHeader {
                title,
                date,
                tags: Vec::new(),
            })?;
            std::fs::write(&path, format!("{}\n", header))?;
            return Ok(path);
        }
        i += 1;
        slug = format!("{}-{}", base, i);
    }
}

/// The post directory's path relative to the content root. The numeric
/// collision suffix lands in both the directory name and the slug, so the
/// two always agree.
fn post_dir_name(layout: DirLayout, date: &str, slug: &str) -> PathBuf {
    match layout {
        DirLayout::Flat => PathBuf::from("posts").join(format!("{}-{}", date, slug)),
        DirLayout::NestedYear => {
            let (year, month_day) = (&date[..4], &date[5..]);
            PathBuf::from("posts")
                .join(year)
                .join(format!("{}-{}", month_day, slug))
        }
    }
}

fn normalized(title: &str) -> Result<String> {
    let slug = slug::normalize(title);
    if slug.is_empty() {
        Err(Error::EmptyTitle)
    } else {
        Ok(slug)
    }
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// The result of a content-creation operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a content-creation failure.
#[derive(Debug)]
pub enum Error {
    /// Returned when a title normalizes to an empty slug; nothing is written.
    EmptyTitle,

    /// Returned when the front-matter header can't be serialized.
    SerializeYaml(serde_yaml::Error),

    /// Returned for other I/O errors.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyTitle => write!(f, "title produces an empty slug"),
            Error::SerializeYaml(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::EmptyTitle => None,
            Error::SerializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts [`serde_yaml::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator for header serialization.
    fn from(err: serde_yaml::Error) -> Error {
        Error::SerializeYaml(err)
    }
}

impl From<io::Error> for Error {
    /// Converts [`io::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{Author, UrlStyle};
    use crate::frontmatter;
    use crate::resolve::Resolver;
    use crate::scan;
    use std::path::Path;
    use tempfile::TempDir;
    use url::Url;

    fn test_config(root: &Path, layout: DirLayout) -> Config {
        Config {
            title: String::from("Test Blog"),
            site_root: Url::parse("https://example.com/").unwrap(),
            author: None,
            layout,
            url_style: UrlStyle::Dated,
            content_directory: root.to_owned(),
            output_directory: root.join("_build"),
            page_template: Vec::new(),
            post_template: Vec::new(),
            listing_template: Vec::new(),
        }
    }

    #[test]
    fn test_create_page_writes_parseable_header() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), DirLayout::Flat);
        let path = create_page_dated(&config, "About Me", "2021-03-14")?;
        assert_eq!(path, tmp.path().join("about-me.md"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let (header, body) = frontmatter::parse(&contents).unwrap();
        assert_eq!(header.title, "About Me");
        assert_eq!(header.date, "2021-03-14");
        assert_eq!(body, "");
        Ok(())
    }

    #[test]
    fn test_create_page_collision_appends_suffix() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), DirLayout::Flat);
        create_page_dated(&config, "About", "2021-03-14")?;
        let second = create_page_dated(&config, "About", "2021-03-15")?;
        let third = create_page_dated(&config, "About", "2021-03-16")?;
        assert_eq!(second, tmp.path().join("about-1.md"));
        assert_eq!(third, tmp.path().join("about-2.md"));
        Ok(())
    }

    #[test]
    fn test_create_post_round_trips_through_scanner() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), DirLayout::Flat);
        create_post_dated(&config, "My First Post", "2021-03-14")?;

        let items = scan::scan(&config).unwrap();
        assert_eq!(items.len(), 1);
        let id = items[0].post_id().unwrap();
        assert_eq!(id.slug, "my-first-post");
        assert_eq!(id.date.year, "2021");

        let resolver = Resolver::new(&config);
        assert!(resolver.resolve_post(&id).is_ok());
        Ok(())
    }

    #[test]
    fn test_create_post_nested_layout() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), DirLayout::NestedYear);
        let path = create_post_dated(&config, "My First Post", "2021-03-14")?;
        assert_eq!(
            path,
            tmp.path()
                .join("posts/2021/03-14-my-first-post/my-first-post.md")
        );
        assert!(tmp
            .path()
            .join("posts/2021/03-14-my-first-post/assets")
            .is_dir());
        Ok(())
    }

    #[test]
    fn test_create_post_collision_suffixes_dir_and_slug() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), DirLayout::Flat);
        create_post_dated(&config, "Duplicate", "2021-03-14")?;
        let second = create_post_dated(&config, "Duplicate", "2021-03-14")?;
        assert_eq!(
            second,
            tmp.path().join("posts/2021-03-14-duplicate-1/duplicate-1.md")
        );

        // No two posts share the same (year, month, day, slug) tuple.
        let items = scan::scan(&config).unwrap();
        let mut ids: Vec<_> = items.iter().filter_map(|i| i.post_id()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 2);
        Ok(())
    }

    #[test]
    fn test_create_rejects_empty_slug() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), DirLayout::Flat);
        assert!(matches!(
            create_page_dated(&config, "!!!", "2021-03-14"),
            Err(Error::EmptyTitle)
        ));
        assert!(matches!(
            create_post_dated(&config, "  ", "2021-03-14"),
            Err(Error::EmptyTitle)
        ));
    }
}
