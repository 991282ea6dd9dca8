//! The route resolver: the bidirectional mapping between identity fields and
//! storage locations. Given a post's identity the resolver reconstructs the
//! directory name the scanner would have derived it from; given only a slug
//! it finds the first directory whose name ends with that slug. Resolution
//! never consults an index; it asks the filesystem, every time.
//!
//! Slug-only lookup is a suffix match by design: the URL slug doesn't repeat
//! the date prefix that's part of the directory name. Two directories can
//! therefore end in the same slug; the resolver takes the first match over
//! lexicographically sorted candidates. The creation tooling's numeric-suffix
//! loop is what keeps that case rare in practice.

use crate::config::{Config, DirLayout};
use crate::scan::PostId;
use std::fmt;
use std::fs::read_dir;
use std::io;
use std::path::{Path, PathBuf};

const MARKDOWN_EXTENSION: &str = ".md";

pub struct Resolver<'a> {
    config: &'a Config,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a Config) -> Resolver<'a> {
        Resolver { config }
    }

    /// Resolves a full post identity to the content file's path relative to
    /// the content root (`<dir>/<slug>.md`), or [`Error::NotFound`] if no
    /// directory with the expected name exists.
    pub fn resolve_post(&self, id: &PostId) -> Result<PathBuf> {
        Ok(self.resolve_post_dir(id)?.join(content_file_name(&id.slug)))
    }

    /// Resolves a full post identity to its directory, relative to the
    /// content root. Month and day are zero-padded to two digits, so callers
    /// may pass `3` where the directory says `03`.
    pub fn resolve_post_dir(&self, id: &PostId) -> Result<PathBuf> {
        let relative = match self.config.layout {
            DirLayout::Flat => PathBuf::from("posts").join(format!(
                "{}-{:0>2}-{:0>2}-{}",
                id.date.year, id.date.month, id.date.day, id.slug
            )),
            DirLayout::NestedYear => PathBuf::from("posts").join(&id.date.year).join(format!(
                "{:0>2}-{:0>2}-{}",
                id.date.month, id.date.day, id.slug
            )),
        };
        if self.is_dir(&relative)? {
            Ok(relative)
        } else {
            Err(Error::NotFound)
        }
    }

    /// Resolves a bare slug to the content file's path relative to the
    /// content root. The first directory (in sorted order) whose name ends
    /// with the slug wins; when several match, the rest are ignored. That is
    /// the first-match policy, not an error.
    pub fn resolve_post_by_slug(&self, slug: &str) -> Result<PathBuf> {
        Ok(self
            .resolve_post_dir_by_slug(slug)?
            .join(content_file_name(slug)))
    }

    /// Resolves a bare slug to its post directory, relative to the content
    /// root.
    pub fn resolve_post_dir_by_slug(&self, slug: &str) -> Result<PathBuf> {
        let posts_root = self.config.content_directory.join("posts");
        match self.config.layout {
            DirLayout::Flat => {
                for name in subdirectories(&posts_root)? {
                    if name.ends_with(slug) {
                        return Ok(PathBuf::from("posts").join(name));
                    }
                }
            }
            DirLayout::NestedYear => {
                for year in subdirectories(&posts_root)? {
                    for name in subdirectories(&posts_root.join(&year))? {
                        if name.ends_with(slug) {
                            return Ok(PathBuf::from("posts").join(year).join(name));
                        }
                    }
                }
            }
        }
        Err(Error::NotFound)
    }

    /// The `assets/` directory for a fully identified post.
    pub fn resolve_asset_dir(&self, id: &PostId) -> Result<PathBuf> {
        Ok(self.resolve_post_dir(id)?.join("assets"))
    }

    /// The `assets/` directory for a slug-only lookup.
    pub fn resolve_asset_dir_by_slug(&self, slug: &str) -> Result<PathBuf> {
        Ok(self.resolve_post_dir_by_slug(slug)?.join("assets"))
    }

    fn is_dir(&self, relative: &Path) -> Result<bool> {
        match std::fs::metadata(self.config.content_directory.join(relative)) {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

fn content_file_name(slug: &str) -> String {
    format!("{}{}", slug, MARKDOWN_EXTENSION)
}

/// The sorted subdirectory names of `dir`. A missing `dir` is an empty posts
/// tree (every lookup in it is simply NotFound), while any other I/O failure
/// is fatal and propagates.
fn subdirectories(dir: &Path) -> Result<Vec<String>> {
    let entries = match read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::Io(e)),
    };
    let mut names = Vec::new();
    for result in entries {
        let entry = result.map_err(Error::Io)?;
        if entry.file_type().map_err(Error::Io)?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// The result of a resolution.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a resolution failure. [`Error::NotFound`] is the expected,
/// frequent, 404-equivalent outcome; [`Error::Io`] is everything else
/// (permissions, hardware) and is fatal to the operation.
#[derive(Debug)]
pub enum Error {
    /// No content matches the requested identity fields.
    NotFound,

    /// Returned for I/O errors other than "does not exist".
    Io(io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "not found"),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound => None,
            Error::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{Author, UrlStyle};
    use crate::scan::PostDate;
    use std::fs;
    use tempfile::TempDir;
    use url::Url;

    fn test_config(root: &Path, layout: DirLayout) -> Config {
        Config {
            title: String::from("Test Blog"),
            site_root: Url::parse("https://example.com/").unwrap(),
            author: Some(Author {
                name: String::from("Test Author"),
                email: None,
            }),
            layout,
            url_style: UrlStyle::Dated,
            content_directory: root.to_owned(),
            output_directory: root.join("_build"),
            page_template: Vec::new(),
            post_template: Vec::new(),
            listing_template: Vec::new(),
        }
    }

    fn post_id(year: &str, month: &str, day: &str, slug: &str) -> PostId {
        PostId {
            date: PostDate {
                year: year.to_owned(),
                month: month.to_owned(),
                day: day.to_owned(),
            },
            slug: slug.to_owned(),
        }
    }

    fn make_post_dir(root: &Path, dir: &str) {
        fs::create_dir_all(root.join("posts").join(dir)).unwrap();
    }

    #[test]
    fn test_resolve_post_flat() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        make_post_dir(tmp.path(), "2021-03-14-my-first-post");
        let config = test_config(tmp.path(), DirLayout::Flat);
        let resolver = Resolver::new(&config);

        assert_eq!(
            resolver.resolve_post(&post_id("2021", "03", "14", "my-first-post"))?,
            PathBuf::from("posts/2021-03-14-my-first-post/my-first-post.md")
        );
        Ok(())
    }

    #[test]
    fn test_resolve_post_nested() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        make_post_dir(tmp.path(), "2021/03-14-my-first-post");
        let config = test_config(tmp.path(), DirLayout::NestedYear);
        let resolver = Resolver::new(&config);

        assert_eq!(
            resolver.resolve_post_dir(&post_id("2021", "03", "14", "my-first-post"))?,
            PathBuf::from("posts/2021/03-14-my-first-post")
        );
        Ok(())
    }

    #[test]
    fn test_resolve_post_zero_pads_month_and_day() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        make_post_dir(tmp.path(), "2021-03-04-short");
        let config = test_config(tmp.path(), DirLayout::Flat);
        let resolver = Resolver::new(&config);

        assert_eq!(
            resolver.resolve_post_dir(&post_id("2021", "3", "4", "short"))?,
            PathBuf::from("posts/2021-03-04-short")
        );
        Ok(())
    }

    #[test]
    fn test_resolve_missing_post_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), DirLayout::Flat);
        let resolver = Resolver::new(&config);

        match resolver.resolve_post_by_slug("missing-post") {
            Err(e) => assert!(e.is_not_found()),
            Ok(p) => panic!("expected NotFound, resolved {:?}", p),
        }
        match resolver.resolve_post(&post_id("2020", "01", "01", "missing-post")) {
            Err(e) => assert!(e.is_not_found()),
            Ok(p) => panic!("expected NotFound, resolved {:?}", p),
        }
    }

    #[test]
    fn test_resolve_by_slug_suffix_match() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        make_post_dir(tmp.path(), "2021-03-14-my-first-post");
        let config = test_config(tmp.path(), DirLayout::Flat);
        let resolver = Resolver::new(&config);

        assert_eq!(
            resolver.resolve_post_by_slug("my-first-post")?,
            PathBuf::from("posts/2021-03-14-my-first-post/my-first-post.md")
        );
        assert_eq!(
            resolver.resolve_asset_dir_by_slug("my-first-post")?,
            PathBuf::from("posts/2021-03-14-my-first-post/assets")
        );
        Ok(())
    }

    #[test]
    fn test_resolve_by_slug_substring_slugs() -> Result<()> {
        // `post` is a suffix of both directory names; `first-post` of one.
        // Suffix matching is intentional, so `post` hits the first sorted
        // candidate.
        let tmp = TempDir::new().unwrap();
        make_post_dir(tmp.path(), "2021-03-14-first-post");
        make_post_dir(tmp.path(), "2021-05-01-post");
        let config = test_config(tmp.path(), DirLayout::Flat);
        let resolver = Resolver::new(&config);

        assert_eq!(
            resolver.resolve_post_dir_by_slug("first-post")?,
            PathBuf::from("posts/2021-03-14-first-post")
        );
        assert_eq!(
            resolver.resolve_post_dir_by_slug("post")?,
            PathBuf::from("posts/2021-03-14-first-post")
        );
        Ok(())
    }

    #[test]
    fn test_resolve_by_slug_first_match_is_deterministic() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        make_post_dir(tmp.path(), "2022-01-01-duplicate");
        make_post_dir(tmp.path(), "2021-01-01-duplicate");
        let config = test_config(tmp.path(), DirLayout::Flat);
        let resolver = Resolver::new(&config);

        // Candidates are sorted before matching, so "first" is stable.
        assert_eq!(
            resolver.resolve_post_dir_by_slug("duplicate")?,
            PathBuf::from("posts/2021-01-01-duplicate")
        );
        Ok(())
    }

    #[test]
    fn test_resolve_asset_dir() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        make_post_dir(tmp.path(), "2021/03-14-my-first-post");
        let config = test_config(tmp.path(), DirLayout::NestedYear);
        let resolver = Resolver::new(&config);

        assert_eq!(
            resolver.resolve_asset_dir(&post_id("2021", "03", "14", "my-first-post"))?,
            PathBuf::from("posts/2021/03-14-my-first-post/assets")
        );
        Ok(())
    }
}
