use log::{debug, error, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use text_diff::print_diff;

use crate::args::Args;
use crate::board::config_reader::*;
use crate::board::io_common::DataSource;
use crate::board::io_dir::DirSource;
use crate::board::io_http::HttpSource;
use crate::board::pages::{run_cycle, Fragments};

mod config_reader;
mod io_common;
mod io_dir;
mod io_http;
mod pages;
mod scheduler;

#[derive(Debug, Snafu)]
pub enum BoardError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid data root {root:?}"))]
    InvalidDataRoot {
        source: url::ParseError,
        root: String,
    },
    #[snafu(display("Error creating the HTTP client"))]
    HttpClient { source: reqwest::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing the notice document"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error listening for the shutdown signal"))]
    Signal { source: std::io::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Everything a refresh needs: where to read, what to render, where to write.
pub struct Board {
    source: Box<dyn DataSource>,
    config: BoardConfig,
    out_dir: PathBuf,
}

impl Board {
    pub fn new(source: Box<dyn DataSource>, config: BoardConfig, out_dir: PathBuf) -> Board {
        Board {
            source,
            config,
            out_dir,
        }
    }

    pub async fn render(&self) -> Fragments {
        run_cycle(self.source.as_ref(), &self.config).await
    }

    /// One cycle: render everything, then write the fragments.
    pub async fn refresh(&self) -> BoardResult<()> {
        info!("Refreshing from {}", self.source.root());
        let fragments = self.render().await;
        write_fragments(&self.out_dir, &fragments)
    }
}

fn make_source(config: &BoardConfig, config_dir: &Path) -> BoardResult<Box<dyn DataSource>> {
    let root = DataRoot::parse(&config.data_root, config_dir)?;
    info!("Reading data from {}", root.display());
    let source: Box<dyn DataSource> = match root {
        DataRoot::Http(url) => Box::new(HttpSource::new(url, config.request_timeout())?),
        DataRoot::Dir(p) => Box::new(DirSource::new(p, config.request_timeout())),
    };
    Ok(source)
}

/// Writes each fragment next to the others, replacing the previous version
/// in one rename so that a reader never sees a half-written file.
fn write_fragments(out_dir: &Path, fragments: &Fragments) -> BoardResult<()> {
    fs::create_dir_all(out_dir).context(WritingOutputSnafu {
        path: out_dir.display().to_string(),
    })?;
    for (name, html) in fragments.iter() {
        let target = out_dir.join(name);
        let tmp = out_dir.join(format!(".{}.tmp", name));
        let path = target.display().to_string();
        fs::write(&tmp, html).context(WritingOutputSnafu { path: path.clone() })?;
        fs::rename(&tmp, &target).context(WritingOutputSnafu { path })?;
        debug!("write_fragments: {} ({} bytes)", name, html.len());
    }
    info!(
        "Wrote {} fragments to {}",
        fragments.len(),
        out_dir.display()
    );
    Ok(())
}

/// Compares the fragments with the files of the same name in `reference_dir`.
fn check_reference(reference_dir: &str, fragments: &Fragments) -> BoardResult<()> {
    let mut mismatches: Vec<&str> = Vec::new();
    for (name, html) in fragments.iter() {
        let p = Path::new(reference_dir).join(name);
        let path = p.display().to_string();
        let expected = fs::read_to_string(&p).context(OpeningJsonSnafu { path })?;
        if expected.trim_end() != html.trim_end() {
            warn!("Found differences with the reference fragment {}", name);
            print_diff(expected.trim_end(), html.trim_end(), "\n");
            mismatches.push(name);
        }
    }
    if !mismatches.is_empty() {
        whatever!(
            "Difference detected between rendered fragments and reference: {:?}",
            mismatches
        )
    }
    Ok(())
}

pub async fn run_board(args: &Args) -> BoardResult<()> {
    let config_path = match args.config.clone() {
        Some(p) => p,
        None => whatever!("a configuration file is required (--config)"),
    };
    let config = read_config(&config_path)?;
    info!("config: {:?}", config);

    let config_dir = Path::new(&config_path)
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    let out_dir = match (&args.out, config.output_directory()) {
        (Some(out), _) => PathBuf::from(out),
        (None, Some(dir)) => config_dir.join(dir),
        (None, None) => config_dir.join(DEFAULT_OUTPUT_DIRECTORY),
    };
    let source = make_source(&config, &config_dir)?;
    let period = config.refresh_interval();
    let board = Board::new(source, config, out_dir);

    if let Some(reference_dir) = &args.reference {
        let fragments = board.render().await;
        check_reference(reference_dir, &fragments)?;
        return write_fragments(&board.out_dir, &fragments);
    }
    if args.once {
        return board.refresh().await;
    }
    scheduler::run_refresh_loop(Arc::new(board), period).await
}

/// Converts a notice ledger to the JSON notice document.
pub fn convert_notices_file(ledger_path: &str, out: Option<&str>) -> BoardResult<()> {
    let text = fs::read_to_string(ledger_path).context(OpeningJsonSnafu { path: ledger_path })?;
    let conv = election_board::notices::convert_notices(&text);
    if !conv.skipped.is_empty() {
        warn!(
            "{} line(s) of {} were skipped: {:?}",
            conv.skipped.len(),
            ledger_path,
            conv.skipped
        );
    }
    let count = conv.notices.len();
    let pretty =
        serde_json::to_string_pretty(&conv.into_document()).context(SerializingJsonSnafu {})?;
    match out {
        None | Some("stdout") => println!("{}", pretty),
        Some(p) => {
            fs::write(p, format!("{}\n", pretty)).context(WritingOutputSnafu { path: p })?;
            info!("Converted {} notices from {} to {}", count, ledger_path, p);
        }
    }
    Ok(())
}
