//! Read access to `.sporemod` archives.
//!
//! Entries are addressed by base name only, case-insensitively; the directory
//! structure inside the archive is ignored.

mod zip;

pub use zip::ZipModArchive;

/// Base name of an archive entry path (`dir/Sub/File.dll` -> `File.dll`).
///
/// Directory entries end with a separator and yield an empty name.
fn entry_base_name(entry_name: &str) -> &str {
    entry_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(entry_name)
}

fn entry_matches(entry_name: &str, file_name: &str) -> bool {
    let base = entry_base_name(entry_name);
    !base.is_empty() && base.eq_ignore_ascii_case(file_name)
}
