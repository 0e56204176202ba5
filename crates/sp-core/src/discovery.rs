//! Patch file discovery
//!
//! Directory scans only pick up files that follow the naming convention;
//! explicitly listed files may instead carry their ordinal in the script.

use crate::error::{CoreError, CoreResult};
use crate::patch::{
    script_ordinal, NewPatchFileName, OrdinalSource, PatchDescriptor, PatchFileName,
    NEW_PATCH_NAME_PATTERN,
};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Compare two strings treating runs of ASCII digits as numbers.
///
/// `+2~a.sql` sorts before `+10~a.sql`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_digits(&mut left);
                let rn = take_digits(&mut right);
                let ln_trimmed = ln.trim_start_matches('0');
                let rn_trimmed = rn.trim_start_matches('0');
                let ord = ln_trimmed
                    .len()
                    .cmp(&rn_trimmed.len())
                    .then_with(|| ln_trimmed.cmp(rn_trimmed))
                    .then_with(|| ln.len().cmp(&rn.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}

fn file_name_str(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// List `*.sql` files directly inside `dir`, natural-sorted by file name
pub fn list_sql_files(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::PatchDirUnreadable {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == "sql"))
        .collect();

    files.sort_by(|a, b| natural_cmp(&file_name_str(a), &file_name_str(b)));
    Ok(files)
}

/// Discover numbered patches (`NNNN~table.sql`) in `dir`, ordered by ordinal
pub fn discover_patches(dir: &Path) -> CoreResult<Vec<PatchDescriptor>> {
    let mut patches = Vec::new();
    for path in list_sql_files(dir)? {
        match PatchFileName::from_path(&path) {
            Some(name) => patches.push(PatchDescriptor {
                ordinal: name.ordinal,
                table: name.table,
                source_path: path,
                ordinal_source: OrdinalSource::FileName,
            }),
            None => log::debug!("Ignoring non-patch file {}", path.display()),
        }
    }
    sort_and_check(patches)
}

/// Describe an explicit list of patch files, ordered by ordinal.
///
/// A file whose name is not `NNNN~table.sql` must contain the legacy
/// `UPDATE site SET value = N WHERE setting = 'sqlpatch'` statement.
pub fn describe_patch_files(files: &[PathBuf]) -> CoreResult<Vec<PatchDescriptor>> {
    let mut patches = Vec::with_capacity(files.len());
    for path in files {
        if let Some(name) = PatchFileName::from_path(path) {
            patches.push(PatchDescriptor {
                ordinal: name.ordinal,
                table: name.table,
                source_path: path.clone(),
                ordinal_source: OrdinalSource::FileName,
            });
            continue;
        }

        let script = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let ordinal = script_ordinal(&script).ok_or_else(|| CoreError::MissingOrdinal {
            path: path.display().to_string(),
        })?;
        let table = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        patches.push(PatchDescriptor {
            ordinal,
            table,
            source_path: path.clone(),
            ordinal_source: OrdinalSource::Script,
        });
    }
    sort_and_check(patches)
}

fn invalid_new_patch_name(path: &Path) -> CoreError {
    CoreError::InvalidPatchName {
        file: path.display().to_string(),
        pattern: NEW_PATCH_NAME_PATTERN.to_string(),
    }
}

/// Discover new patches (`+N~table.sql`) in `dir`, in natural file-name order.
///
/// Files that start with `+` but do not follow the pattern are reported
/// and left out.
pub fn discover_new_patches(dir: &Path) -> CoreResult<Vec<(PathBuf, NewPatchFileName)>> {
    let mut found = Vec::new();
    for path in list_sql_files(dir)? {
        match NewPatchFileName::from_path(&path) {
            Some(name) => found.push((path, name)),
            None if file_name_str(&path).starts_with('+') => {
                let err = invalid_new_patch_name(&path);
                log::warn!("{err}; fix it before continuing");
            }
            None => {}
        }
    }
    Ok(found)
}

fn sort_and_check(mut patches: Vec<PatchDescriptor>) -> CoreResult<Vec<PatchDescriptor>> {
    patches.sort_by_key(|p| p.ordinal);
    if let Some(pair) = patches.windows(2).find(|w| w[0].ordinal == w[1].ordinal) {
        return Err(CoreError::DuplicateOrdinal {
            ordinal: pair[0].ordinal,
            first: pair[0].source_path.display().to_string(),
            second: pair[1].source_path.display().to_string(),
        });
    }
    Ok(patches)
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
