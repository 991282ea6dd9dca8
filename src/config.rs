//! Project configuration. All of the engine's knobs (the content root, the
//! naming scheme, the site's base URL, theme template lists) live in one
//! explicit [`Config`] struct threaded by reference into the scanner,
//! resolver, enumerator, and freezer. There is no ambient global state.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// How post directories are laid out under `content/posts/`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirLayout {
    /// `posts/YYYY-MM-DD-slug/`
    Flat,
    /// `posts/YYYY/MM-DD-slug/`
    NestedYear,
}

impl Default for DirLayout {
    fn default() -> Self {
        DirLayout::Flat
    }
}

/// Which identity fields appear in post URLs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrlStyle {
    /// `/blog/<year>/<month>/<day>/<slug>/`
    Dated,
    /// `/blog/<slug>/`
    SlugOnly,
}

impl Default for UrlStyle {
    fn default() -> Self {
        UrlStyle::Dated
    }
}

/// The site author, used for feed entries.
#[derive(Clone, Debug, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct Project {
    title: String,
    site_root: Url,

    #[serde(default)]
    author: Option<Author>,

    #[serde(default)]
    layout: DirLayout,

    #[serde(default)]
    url_style: UrlStyle,
}

#[derive(Deserialize)]
struct Theme {
    page_template: Vec<PathBuf>,
    post_template: Vec<PathBuf>,
    listing_template: Vec<PathBuf>,
}

pub struct Config {
    /// The site title, used by the listing page and the feed.
    pub title: String,

    /// The absolute base URL of the published site. Always ends in `/` so
    /// that [`Url::join`] treats it as a directory.
    pub site_root: Url,

    /// The site author, if configured.
    pub author: Option<Author>,

    /// The post-directory layout. Selected once at startup; the scanner,
    /// resolver, and creation tooling all read the same value.
    pub layout: DirLayout,

    /// The post-URL style. Selected once at startup.
    pub url_style: UrlStyle,

    /// The content root: pages at the top level, posts under `posts/`.
    pub content_directory: PathBuf,

    /// Where the frozen site is written.
    pub output_directory: PathBuf,

    /// Template-file chains for page, post, and listing rendering. Each chain
    /// is concatenated before parsing, since the template engine has no
    /// inheritance.
    pub page_template: Vec<PathBuf>,
    pub post_template: Vec<PathBuf>,
    pub listing_template: Vec<PathBuf>,
}

impl Config {
    /// Walks up from `dir` looking for a `glacier.yaml` project file, then
    /// loads it via [`Config::from_project_file`].
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let path = dir.join("glacier.yaml");
        if path.exists() {
            match Config::from_project_file(&path, output_directory) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(anyhow!(
                    "Could not find `glacier.yaml` in any parent directory"
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => {
                let theme_dir = project_root.join("theme");
                let theme_file = open(&theme_dir.join("theme.yaml"), "theme")?;
                let theme: Theme = serde_yaml::from_reader(theme_file)?;
                Ok(Config {
                    title: project.title,
                    site_root: ensure_trailing_slash(project.site_root),
                    author: project.author,
                    layout: project.layout,
                    url_style: project.url_style,
                    content_directory: project_root.join("content"),
                    output_directory: output_directory.to_owned(),
                    page_template: theme
                        .page_template
                        .iter()
                        .map(|relpath| theme_dir.join(relpath))
                        .collect(),
                    post_template: theme
                        .post_template
                        .iter()
                        .map(|relpath| theme_dir.join(relpath))
                        .collect(),
                    listing_template: theme
                        .listing_template
                        .iter()
                        .map(|relpath| theme_dir.join(relpath))
                        .collect(),
                })
            }
        }
    }
}

/// `Url::join` treats a base without a trailing slash as a file and replaces
/// its last segment, so the site root is normalized to directory form here,
/// once, instead of at every join site.
fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}
