use std::io::Write;
use std::path::Path;

use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use tempfile::NamedTempFile;

use super::model::TripTable;
use crate::error::{Error, Result};

/// Write `table` to `path` as a single parquet file.
///
/// The file is encoded next to its destination and renamed into place, so
/// `path` either holds the complete table or is left as it was.
pub fn write_parquet(table: &TripTable, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(ZstdLevel::default()))
        .build();
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer =
        ArrowWriter::try_new(staged.as_file_mut(), table.schema(), Some(props)).map_err(write_err)?;
    writer.write(table.batch()).map_err(write_err)?;
    writer.close().map_err(write_err)?;

    staged
        .as_file_mut()
        .flush()
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|e| Error::io(staged.path(), e))?;
    staged
        .persist(path)
        .map_err(|e| Error::io(path, e.error))?;

    log::info!("Wrote {} trips to {}", table.num_rows(), path.display());
    Ok(())
}
