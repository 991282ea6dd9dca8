use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, SubCommand};
use glacier::config::Config;
use glacier::{freeze, new};
use std::io::Write;
use std::path::Path;

fn main() -> Result<()> {
    let matches = App::new("glacier")
        .about("A static site generator for a personal blog")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("build")
                .about("Freezes the site into a static output directory")
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .default_value("_build")
                        .help("The directory the frozen site is written to"),
                ),
        )
        .subcommand(
            SubCommand::with_name("new-post")
                .about("Creates a new post directory and content file")
                .arg(
                    Arg::with_name("title")
                        .short("t")
                        .long("title")
                        .takes_value(true)
                        .help("The post title (prompted for if omitted)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("new-page")
                .about("Creates a new top-level page")
                .arg(
                    Arg::with_name("title")
                        .short("t")
                        .long("title")
                        .takes_value(true)
                        .help("The page title (prompted for if omitted)"),
                ),
        )
        .get_matches();

    let current_dir = std::env::current_dir()?;
    match matches.subcommand() {
        ("build", Some(matches)) => {
            let output = matches.value_of("output").unwrap(); // the arg has a default
            let config = Config::from_directory(&current_dir, Path::new(output))?;
            freeze::freeze(&config)?;
            println!("Site frozen into {}", output);
        }
        ("new-post", Some(matches)) => {
            let config = Config::from_directory(&current_dir, Path::new("_build"))?;
            let title = title_arg(matches, "Post title: ")?;
            let path = new::create_post(&config, &title)?;
            println!("Created post {} in {}", title, path.display());
        }
        ("new-page", Some(matches)) => {
            let config = Config::from_directory(&current_dir, Path::new("_build"))?;
            let title = title_arg(matches, "Page title: ")?;
            let path = new::create_page(&config, &title)?;
            println!("Created page {} in {}", title, path.display());
        }
        _ => unreachable!(), // SubcommandRequiredElseHelp
    }
    Ok(())
}

/// The title from `--title`, or read interactively from stdin. Blank titles
/// are rejected before anything touches the filesystem.
fn title_arg(matches: &clap::ArgMatches, prompt: &str) -> Result<String> {
    let title = match matches.value_of("title") {
        Some(title) => title.to_owned(),
        None => {
            print!("{}", prompt);
            std::io::stdout().flush()?;
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            line
        }
    };
    let title = title.trim().to_owned();
    if title.is_empty() {
        Err(anyhow!("title cannot be blank"))
    } else {
        Ok(title)
    }
}
