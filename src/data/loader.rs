use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use reqwest::Url;
use tempfile::NamedTempFile;

use super::model::TripTable;
use crate::error::{Error, Result};

/// Extension given to downloads whose URL path has none.
const DEFAULT_SUFFIX: &str = ".parquet";

/// Knobs for [`load_with`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Upper bound on the whole download (connect, headers and body).
    pub timeout: Duration,
    /// Honour `HTTP_PROXY` / `HTTPS_PROXY` / `NO_PROXY` for remote inputs.
    pub system_proxy: bool,
    /// Where downloads are staged; the system temp dir when `None`.
    pub download_dir: Option<PathBuf>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            system_proxy: true,
            download_dir: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Whether `location` is an HTTP(S) URL rather than a filesystem path.
pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Load a parquet trip table from a local path or an HTTP(S) URL.
pub fn load(location: &str) -> Result<TripTable> {
    load_with(location, &LoadOptions::default())
}

/// [`load`] with explicit options.
///
/// Errors:
/// * [`Error::NotFound`]  – local path does not exist (checked before decoding)
/// * [`Error::Transport`] – remote fetch failed
/// * [`Error::Decode`]    – the bytes are not a readable parquet file
pub fn load_with(location: &str, options: &LoadOptions) -> Result<TripTable> {
    if is_url(location) {
        load_remote(location, options)
    } else {
        load_local(Path::new(location))
    }
}

fn load_local(path: &Path) -> Result<TripTable> {
    if !path.exists() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    read_parquet(path, &path.display().to_string())
}

fn load_remote(url: &str, options: &LoadOptions) -> Result<TripTable> {
    let download = download_to_tempfile(url, options)?;
    let table = read_parquet(download.path(), url);

    // The table is already in memory (or decoding failed); a leftover temp
    // file is not worth surfacing.
    let tmp_path = download.path().to_path_buf();
    if let Err(e) = download.close() {
        log::debug!("Could not remove {}: {e}", tmp_path.display());
    }
    table
}

// ---------------------------------------------------------------------------
// Remote download
// ---------------------------------------------------------------------------

/// Suffix for the temporary download: the URL path's extension, if any.
fn temp_suffix(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            Path::new(u.path())
                .extension()
                .and_then(|e| e.to_str())
                .filter(|e| !e.is_empty())
                .map(|e| format!(".{e}"))
        })
        .unwrap_or_else(|| DEFAULT_SUFFIX.to_string())
}

/// Stream `url` into a uniquely named temporary file.
///
/// The returned handle deletes the file when dropped, on every exit path.
fn download_to_tempfile(url: &str, options: &LoadOptions) -> Result<NamedTempFile> {
    let transport = |source| Error::Transport {
        url: url.to_string(),
        source,
    };

    let mut builder = reqwest::blocking::Client::builder().timeout(options.timeout);
    if !options.system_proxy {
        builder = builder.no_proxy();
    }
    let client = builder.build().map_err(transport)?;

    let mut response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(transport)?;

    let dir = options
        .download_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let mut tmp = tempfile::Builder::new()
        .prefix("taxi-percentile-")
        .suffix(&temp_suffix(url))
        .tempfile_in(&dir)
        .map_err(|e| Error::io(&dir, e))?;

    let bytes = response.copy_to(tmp.as_file_mut()).map_err(transport)?;
    tmp.as_file_mut()
        .flush()
        .map_err(|e| Error::io(tmp.path(), e))?;

    log::debug!(
        "Downloaded {bytes} bytes from {url} to {}",
        tmp.path().display()
    );
    Ok(tmp)
}

// ---------------------------------------------------------------------------
// Parquet decoding
// ---------------------------------------------------------------------------

/// Decode a parquet file into a single-batch [`TripTable`].
///
/// `location` names the input in error messages (the URL for downloads).
fn read_parquet(path: &Path, location: &str) -> Result<TripTable> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| Error::decode(location, e))?;
    let schema = builder.schema().clone();
    let reader = builder.build().map_err(|e| Error::decode(location, e))?;

    let batches = reader
        .collect::<std::result::Result<Vec<RecordBatch>, ArrowError>>()
        .map_err(|e| Error::decode(location, e))?;
    let table = TripTable::from_batches(schema, &batches)?;

    log::info!(
        "Loaded {} trips from {location} with columns {:?}",
        table.num_rows(),
        table.column_names()
    );
    Ok(table)
}
