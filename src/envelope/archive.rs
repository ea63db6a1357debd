use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use zip::ZipArchive;
use zip::write::SimpleFileOptions;

use crate::core::PadnextError;

/// Write `files` into a deflate-compressed zip at `archive`.
///
/// Entries are stored under their base names; directories are never recorded.
pub fn compress_files(files: &[PathBuf], archive: &Path) -> Result<(), PadnextError> {
    let out = File::create(archive)?;
    let mut zip = zip::ZipWriter::new(BufWriter::new(out));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for path in files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PadnextError::Archive(format!("invalid file name: {}", path.display())))?;
        zip.start_file(name, options).map_err(zip_error)?;
        let mut input = BufReader::new(File::open(path)?);
        io::copy(&mut input, &mut zip)?;
    }

    let mut writer = zip.finish().map_err(zip_error)?;
    writer.flush()?;
    Ok(())
}

/// Extract every entry of `archive` into `dest` and return the entry names.
///
/// The archive must be flat: entries with directory components, absolute
/// paths or `..` are rejected before anything is written.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<Vec<String>, PadnextError> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(zip_error)?;

    let names: Vec<String> = zip.file_names().map(str::to_string).collect();
    for name in &names {
        check_entry_name(name)?;
    }

    fs::create_dir_all(dest)?;
    let mut extracted = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(zip_error)?;
        let name = entry.name().to_string();
        let mut out = File::create(dest.join(&name))?;
        io::copy(&mut entry, &mut out)?;
        extracted.push(name);
    }
    Ok(extracted)
}

fn check_entry_name(name: &str) -> Result<(), PadnextError> {
    let path = Path::new(name);
    let mut components = path.components();
    let flat = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !flat || name.contains('\\') || name.ends_with('/') {
        return Err(PadnextError::Archive(format!(
            "refusing archive entry '{name}': entries must be plain file names"
        )));
    }
    Ok(())
}

fn zip_error(e: zip::result::ZipError) -> PadnextError {
    PadnextError::Archive(e.to_string())
}
