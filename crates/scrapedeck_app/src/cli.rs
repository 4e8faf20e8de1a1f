use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use scrapedeck_core::DEFAULT_IMAGES_PER_CLASS;

use crate::platform::DEFAULT_CONFIG_PATH;

#[derive(Debug, Parser)]
#[command(
    name = "scrapedeck",
    version,
    about = "Drive a bulk image scraping backend from the terminal"
)]
pub struct Cli {
    /// RON config file; missing is fine.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// Backend address, overriding the config file.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a bulk search and follow it until it completes.
    Search(SearchArgs),
    /// Follow the job that is already running, if there is one.
    Watch(WatchArgs),
    /// Move or delete images in one class folder.
    Images(ImagesArgs),
    /// Download or clear the backend's scraping log.
    Logs {
        #[command(subcommand)]
        action: LogsAction,
    },
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// One search row; repeat for more.
    #[arg(
        long = "entry",
        value_name = "KEYWORD:CLASS[:DEST]",
        required = true,
        value_parser = parse_entry
    )]
    pub entries: Vec<EntryArg>,
    #[arg(long, value_name = "N", default_value = DEFAULT_IMAGES_PER_CLASS)]
    pub images_per_class: String,
    /// Folder used by rows that name no destination of their own.
    #[arg(long, value_name = "DIR", default_value = "")]
    pub destination: String,
    /// Download the full log into DIR once the job completes.
    #[arg(long, value_name = "DIR")]
    pub save_logs: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Download the full log into DIR once the job completes.
    #[arg(long, value_name = "DIR")]
    pub save_logs: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ImagesArgs {
    /// Class folder the images currently live in.
    #[arg(long)]
    pub folder: String,
    #[command(subcommand)]
    pub action: ImagesAction,
}

#[derive(Debug, Subcommand)]
pub enum ImagesAction {
    Move {
        /// Destination folder.
        #[arg(long)]
        to: String,
        /// Create the destination instead of picking an existing one.
        #[arg(long)]
        create: bool,
        /// Image paths relative to the download root.
        #[arg(required = true)]
        images: Vec<String>,
    },
    Delete {
        /// Must be DELETE (any case).
        #[arg(long, value_name = "PHRASE")]
        confirm: String,
        #[arg(required = true)]
        images: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum LogsAction {
    Download {
        #[arg(long, value_name = "DIR", default_value = ".")]
        dir: PathBuf,
    },
    /// Clears the log on the backend. Asks for --yes.
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

/// One `--entry` value, split but not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryArg {
    pub keyword: String,
    pub class_name: String,
    pub destination: String,
}

/// Splits `KEYWORD:CLASS[:DEST]`. Missing parts come back empty so the
/// search form can report them the same way it reports blank fields.
pub fn parse_entry(raw: &str) -> Result<EntryArg, String> {
    if !raw.contains(':') {
        return Err(format!("expected KEYWORD:CLASS[:DEST], got {raw:?}"));
    }
    let mut parts = raw.splitn(3, ':');
    let mut next = || parts.next().unwrap_or_default().to_string();
    Ok(EntryArg {
        keyword: next(),
        class_name: next(),
        destination: next(),
    })
}
