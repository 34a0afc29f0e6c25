use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use super::entry_matches;
use crate::error::{ManifestError, ModError};
use crate::manifest::{MANIFEST_FILE_NAME, ModManifest, parse_manifest};
use crate::runtime::Runtime;

/// A `.sporemod` (zip) archive loaded into memory.
pub struct ZipModArchive {
    path: PathBuf,
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl ZipModArchive {
    #[tracing::instrument(skip(runtime))]
    pub fn open<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let mut reader = runtime
            .open(path)
            .with_context(|| format!("Failed to open archive at {:?}", path))?;

        // ZipArchive needs Read + Seek; Runtime::open only gives Read.
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read archive {:?}", path))?;

        let archive = ZipArchive::new(Cursor::new(buffer))
            .with_context(|| format!("Failed to parse ZIP archive {:?}", path))?;
        debug!("Opened {:?} with {} entries", path, archive.len());

        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    /// Index of the first entry whose base name equals `file_name`, ignoring case.
    fn find(&self, file_name: &str) -> Option<usize> {
        (0..self.archive.len()).find(|&i| {
            self.archive
                .name_for_index(i)
                .is_some_and(|name| entry_matches(name, file_name))
        })
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.find(file_name).is_some()
    }

    /// Locate and parse the archive's `modinfo.xml`.
    pub fn read_manifest(&mut self) -> Result<ModManifest> {
        let index = self
            .find(MANIFEST_FILE_NAME)
            .ok_or(ModError::Manifest(ManifestError::Missing))?;

        let context = || format!("Failed to read {} from {:?}", MANIFEST_FILE_NAME, self.path);
        let mut bytes = Vec::new();
        self.archive
            .by_index(index)
            .with_context(context)?
            .read_to_end(&mut bytes)
            .with_context(context)?;

        let manifest = parse_manifest(&bytes).map_err(ModError::from)?;
        Ok(manifest)
    }

    /// Stream the entry named `file_name` to `dest`, overwriting it.
    ///
    /// Nothing is touched when the entry is missing. Once `dest` has been
    /// created, a failed copy removes it again.
    #[tracing::instrument(skip(self, runtime))]
    pub fn extract_file<R: Runtime>(
        &mut self,
        runtime: &R,
        file_name: &str,
        dest: &Path,
    ) -> Result<()> {
        let index = self
            .find(file_name)
            .ok_or_else(|| ModError::MissingArchiveFile(file_name.to_string()))?;

        let mut entry = self
            .archive
            .by_index(index)
            .with_context(|| format!("Failed to read ZIP entry {}", file_name))?;
        let mut dest_file = runtime.create_file(dest)?;
        let copied = std::io::copy(&mut entry, &mut dest_file).and_then(|_| dest_file.flush());
        drop(dest_file);

        if let Err(e) = copied {
            if let Err(cleanup) = runtime.remove_file(dest) {
                warn!("Failed to remove partially extracted {:?}: {:#}", dest, cleanup);
            }
            return Err(e).with_context(|| format!("Failed to extract file {:?}", dest));
        }

        debug!("Extracted {} to {:?}", file_name, dest);
        Ok(())
    }
}
