//! The route model and enumerator. A [`Route`] names one servable resource
//! (a page, a post, or a post asset) together with the identity fields that
//! locate it. [`enumerate`] produces the exhaustive set of routes for a
//! content tree so the freeze driver can render every one of them; it walks
//! the filesystem afresh on every call (nothing is cached), so it can be
//! re-invoked after content changes and always reflects the tree as it is.
//!
//! Post routes always carry the full identity (year, month, day, slug) even
//! when the configured URL style only shows the slug: the scanner knows all
//! four fields anyway, and carrying them keeps one enumeration serviceable by
//! either resolver entry point.

use crate::config::{Config, UrlStyle};
use crate::scan::{self, PostId};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;

/// One enumerable resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// A top-level page; `path` is the markdown file's stem. The `home` page
    /// is the site root.
    Page { path: String },

    /// A single post.
    Post(PostId),

    /// A static file under a post's `assets/` subtree. `filename` is the
    /// path relative to the assets directory and may contain subdirectories.
    PostAsset { post: PostId, filename: PathBuf },
}

impl Route {
    /// The route's path relative to the site root. Directory-style routes
    /// (everything but assets) end in `/`.
    pub fn url_path(&self, style: UrlStyle) -> String {
        match self {
            Route::Page { path } if path == "home" => String::new(),
            Route::Page { path } => format!("{}/", path),
            Route::Post(id) => post_url_path(id, style),
            Route::PostAsset { post, filename } => format!(
                "{}assets/{}",
                post_url_path(post, style),
                slash_join(filename)
            ),
        }
    }

    /// The route's absolute URL under the configured site root.
    pub fn url(&self, config: &Config) -> std::result::Result<Url, url::ParseError> {
        config.site_root.join(&self.url_path(config.url_style))
    }

    /// Where the route's rendered output lives in the frozen tree, relative
    /// to the output root. Directory-style routes become `<path>/index.html`;
    /// assets keep their own names.
    pub fn output_path(&self, config: &Config) -> PathBuf {
        let path = PathBuf::from(self.url_path(config.url_style));
        match self {
            Route::PostAsset { .. } => path,
            _ => path.join("index.html"),
        }
    }
}

fn post_url_path(id: &PostId, style: UrlStyle) -> String {
    match style {
        UrlStyle::Dated => format!(
            "blog/{}/{}/{}/{}/",
            id.date.year, id.date.month, id.date.day, id.slug
        ),
        UrlStyle::SlugOnly => format!("blog/{}/", id.slug),
    }
}

/// Joins a relative path's components with `/` regardless of platform, for
/// use in URLs.
fn slash_join(path: &Path) -> String {
    path.iter()
        .map(|component| component.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Enumerates every route needed to freeze a fully static copy of the site:
/// one per page, one per post, one per asset file, in that order. Every
/// emitted route resolves to an existing file through the resolver: posts
/// whose content file is missing were already skipped by the scanner, and
/// asset routes are only emitted for regular files the walk just saw.
pub fn enumerate(config: &Config) -> Result<Vec<Route>> {
    let items = scan::scan(config)?;
    let mut routes = Vec::new();

    for item in &items {
        if item.post_id().is_none() {
            routes.push(Route::Page {
                path: item.slug.clone(),
            });
        }
    }

    for item in &items {
        if let Some(id) = item.post_id() {
            routes.push(Route::Post(id));
        }
    }

    for item in &items {
        if let Some(id) = item.post_id() {
            // the content file always lives inside its post directory
            let post_dir = item.relative_path.parent().unwrap();
            let assets_dir = config.content_directory.join(post_dir).join("assets");
            if !assets_dir.is_dir() {
                continue;
            }
            for result in WalkDir::new(&assets_dir) {
                let entry = result?;
                if entry.file_type().is_file() {
                    routes.push(Route::PostAsset {
                        post: id.clone(),
                        // `assets_dir` is always an ancestor of `entry`
                        filename: entry.path().strip_prefix(&assets_dir).unwrap().to_owned(),
                    });
                }
            }
        }
    }

    Ok(routes)
}

/// The result of an enumeration.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an enumeration failure. Enumeration only reads the filesystem,
/// so everything here is I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O errors during the content scan.
    Io(io::Error),

    /// Returned for I/O errors during the recursive assets walk.
    WalkDir(walkdir::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts [`io::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator inside the assets walk.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}
