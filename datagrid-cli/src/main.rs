//! Prints one page of a JSON data file through the grid.

use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use datagrid::{Grid, GridError, GridOptions, render_text};
use datagrid_core::LoadError;
use datagrid_core::connector::{DataConnector, JsonConnector, JsonOrientation};
use datagrid_core::modifier::Direction;
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read options file {path}: {source}")]
    ReadOptions {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid options file {path}: {source}")]
    ParseOptions {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to create log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Layout of the JSON data file.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
enum Orientation {
    /// An array of row objects, or arrays with a header row first
    #[default]
    Rows,
    /// An array of column arrays, each starting with its name
    Columns,
}

impl From<Orientation> for JsonOrientation {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Rows => JsonOrientation::Rows,
            Orientation::Columns => JsonOrientation::Columns,
        }
    }
}

/// Render a JSON data file as a grid page.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON data file
    data: PathBuf,

    /// JSON grid options file
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Layout of the data file
    #[arg(long, value_enum, default_value_t)]
    orientation: Orientation,

    /// Column to sort by
    #[arg(short, long)]
    sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Rows per page; enables pagination
    #[arg(long)]
    page_size: Option<usize>,

    /// Page to print, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Log file
    #[arg(long, default_value = "datagrid.log")]
    log_file: PathBuf,
}

fn read_options(args: &Args) -> Result<GridOptions, CliError> {
    let mut options = match &args.options {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::ReadOptions {
                path: path.clone(),
                source,
            })?;
            GridOptions::from_json(&text).map_err(|source| CliError::ParseOptions {
                path: path.clone(),
                source,
            })?
        }
        None => GridOptions::new(),
    };

    if let Some(page_size) = args.page_size {
        options = options.with_pagination(page_size);
    }
    // Print every row of the page
    options.rendering.virtualization = false;
    Ok(options)
}

async fn run(args: Args) -> Result<(), CliError> {
    let log_file = File::create(&args.log_file).map_err(|source| CliError::LogFile {
        path: args.log_file.clone(),
        source,
    })?;
    // Only fails when a logger is already installed
    let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);

    let options = read_options(&args)?;
    let connector =
        JsonConnector::from_file(args.data.clone()).with_orientation(args.orientation.into());
    let table = connector.load().await?;
    let mut grid = Grid::new(table, options)?;

    if let Some(field) = &args.sort {
        let direction = if args.desc { Direction::Desc } else { Direction::Asc };
        grid.sort_by(field, Some(direction))?;
    }
    if args.page > 1 {
        grid.go_to_page(args.page - 1);
    }

    info!("Printing page {} of {}", grid.pagination().page() + 1, args.data.display());
    print!("{}", render_text(&grid.snapshot()));
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args() {
        Args::command().debug_assert();

        let args = Args::parse_from(["datagrid", "data.json", "--sort", "name", "--desc", "-p", "2"]);
        assert_eq!(args.sort.as_deref(), Some("name"));
        assert!(args.desc);
        assert_eq!(args.page, 2);
        assert_eq!(args.orientation, Orientation::Rows);
    }

    #[test]
    fn test_desc_requires_sort() {
        assert!(Args::try_parse_from(["datagrid", "data.json", "--desc"]).is_err());
    }

    #[test]
    fn test_page_size_enables_pagination() {
        let args = Args::parse_from(["datagrid", "data.json", "--page-size", "5"]);
        let options = read_options(&args).unwrap();
        assert!(options.pagination.enabled);
        assert_eq!(options.pagination.page_size, 5);
        assert!(!options.rendering.virtualization);
    }
}
