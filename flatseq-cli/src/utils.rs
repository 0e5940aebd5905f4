use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Result, bail};
use clap::ArgMatches;

use flatseq_core::utils::{FileType, get_file_info};

/// The `inputs` positional arguments as paths.
pub fn input_paths(matches: &ArgMatches) -> Vec<PathBuf> {
    matches
        .get_many::<String>("inputs")
        .map(|inputs| inputs.map(PathBuf::from).collect())
        .unwrap_or_default()
}

///
/// Input format of `path`: the explicit `from` when given, otherwise
/// detected from the file extension.
///
pub fn resolve_format(path: &Path, from: Option<&str>) -> Result<FileType> {
    let file_type = match from {
        Some(from) => FileType::from_str(from).unwrap_or(FileType::Unknown),
        None => get_file_info(path).file_type,
    };
    if file_type == FileType::Unknown {
        bail!(
            "Cannot determine the input format of {}: use --from embl|genbank|agp|fasta",
            path.display()
        );
    }
    Ok(file_type)
}

/// `outdir/<name without .gz and extension>.<extension>`
pub fn output_path(input: &Path, outdir: &Path, extension: &str) -> PathBuf {
    let name = input.file_name().and_then(OsStr::to_str).unwrap_or("entries");
    let name = name.strip_suffix(".gz").unwrap_or(name);
    let stem = Path::new(name)
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(name);
    outdir.join(format!("{}.{}", stem, extension))
}
