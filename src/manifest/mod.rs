//! Mod manifest (`modinfo.xml`) model and parser.
//!
//! The manifest describes what a `.sporemod` archive can install:
//! mutually exclusive component groups, independently selectable components,
//! mandatory prerequisites and compat files that only apply when other
//! files are already present.
//!
//! File lists are `?`-delimited in the element text, and the optional `game`
//! attribute carries a parallel `?`-delimited list of target games.

mod version;
mod xml;

use log::debug;

use crate::error::ManifestError;
use crate::location::InstallLocation;
use crate::registry::InstalledModFile;

pub use version::ModVersion;
use xml::{CompatFileXml, ComponentGroupXml, ComponentXml, FilesXml, ModInfoXml};

/// Name of the manifest entry inside a mod archive (matched case-insensitively).
pub const MANIFEST_FILE_NAME: &str = "modinfo.xml";

const LIST_DELIMITER: char = '?';

/// Parsed `modinfo.xml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModManifest {
    pub display_name: String,
    pub unique_name: String,
    pub description: String,
    pub is_experimental: bool,
    pub requires_galaxy_reset: bool,
    pub causes_save_data_dependency: bool,
    pub installer_system_version: Option<ModVersion>,
    pub dlls_build: Option<ModVersion>,
    pub component_groups: Vec<ComponentGroup>,
    pub components: Vec<Component>,
    pub prerequisites: Vec<Prerequisite>,
    pub compat_files: Vec<CompatFile>,
}

/// A set of components of which exactly one is installed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentGroup {
    pub display_name: String,
    pub unique_name: String,
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    pub display_name: String,
    pub unique_name: String,
    pub description: String,
    /// Shown to the user as a hint, never applied as a default.
    pub default_checked: bool,
    pub files: Vec<InstalledModFile>,
}

/// Files that are always installed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prerequisite {
    pub files: Vec<InstalledModFile>,
}

/// Files installed only when every `required` file already exists on disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompatFile {
    pub required: Vec<InstalledModFile>,
    pub files: Vec<InstalledModFile>,
}

impl ModManifest {
    /// Whether the user has to make any choice before installing.
    pub fn needs_configuration(&self) -> bool {
        self.is_experimental
            || self.requires_galaxy_reset
            || self.causes_save_data_dependency
            || self.component_groups.iter().any(|g| !g.components.is_empty())
            || !self.components.is_empty()
    }
}

/// Parse the raw bytes of a `modinfo.xml` document.
#[tracing::instrument(skip(bytes))]
pub fn parse_manifest(bytes: &[u8]) -> Result<ModManifest, ManifestError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ManifestError::Encoding)?;
    let text = text.trim_start_matches('\u{feff}').trim();

    let raw: ModInfoXml = quick_xml::de::from_str(text).inspect_err(|e| {
        debug!("modinfo.xml parsing failed: {}", e);
    })?;

    from_xml(raw)
}

fn from_xml(raw: ModInfoXml) -> Result<ModManifest, ManifestError> {
    Ok(ModManifest {
        display_name: raw.display_name.unwrap_or_default(),
        unique_name: raw.unique.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        is_experimental: parse_bool("isExperimental", raw.is_experimental.as_deref())?,
        requires_galaxy_reset: parse_bool(
            "requiresGalaxyReset",
            raw.requires_galaxy_reset.as_deref(),
        )?,
        causes_save_data_dependency: parse_bool(
            "causesSaveDataDependency",
            raw.causes_save_data_dependency.as_deref(),
        )?,
        installer_system_version: parse_version(raw.installer_system_version.as_deref())?,
        dlls_build: parse_version(raw.dlls_build.as_deref())?,
        component_groups: raw
            .component_groups
            .into_iter()
            .map(parse_component_group)
            .collect::<Result<_, _>>()?,
        components: raw
            .components
            .into_iter()
            .map(parse_component)
            .collect::<Result<_, _>>()?,
        prerequisites: raw
            .prerequisites
            .into_iter()
            .map(parse_prerequisite)
            .collect::<Result<_, _>>()?,
        compat_files: raw
            .compat_files
            .into_iter()
            .map(parse_compat_file)
            .collect::<Result<_, _>>()?,
    })
}

fn parse_component_group(raw: ComponentGroupXml) -> Result<ComponentGroup, ManifestError> {
    Ok(ComponentGroup {
        display_name: raw.display_name.unwrap_or_default(),
        unique_name: raw.unique.unwrap_or_default(),
        components: raw
            .components
            .into_iter()
            .map(parse_component)
            .collect::<Result<_, _>>()?,
    })
}

fn parse_component(raw: ComponentXml) -> Result<Component, ManifestError> {
    let display_name = raw.display_name.unwrap_or_default();
    let unique_name = raw.unique.unwrap_or_default();
    let label = format!(
        "component {}",
        if unique_name.is_empty() { &display_name } else { &unique_name }
    );

    Ok(Component {
        files: parse_files(&label, raw.game.as_deref(), &raw.files)?,
        default_checked: parse_bool("defaultChecked", raw.default_checked.as_deref())?,
        description: raw.description.unwrap_or_default(),
        display_name,
        unique_name,
    })
}

fn parse_prerequisite(raw: FilesXml) -> Result<Prerequisite, ManifestError> {
    Ok(Prerequisite {
        files: parse_files("prerequisite", raw.game.as_deref(), &raw.files)?,
    })
}

fn parse_compat_file(raw: CompatFileXml) -> Result<CompatFile, ManifestError> {
    Ok(CompatFile {
        required: parse_files(
            "compatFile target",
            raw.target_game.as_deref(),
            raw.target_files.as_deref().unwrap_or_default(),
        )?,
        files: parse_files("compatFile", raw.game.as_deref(), &raw.files)?,
    })
}

/// Pair a `?`-delimited file list with its `?`-delimited game list.
///
/// Without a `game` attribute every file goes to ModLibs. With one, both
/// lists must have the same length.
fn parse_files(
    element: &str,
    game: Option<&str>,
    files: &str,
) -> Result<Vec<InstalledModFile>, ManifestError> {
    let files = files.trim();
    let file_names: Vec<String> = if files.is_empty() {
        Vec::new()
    } else {
        files
            .split(LIST_DELIMITER)
            .map(validate_file_name)
            .collect::<Result<_, _>>()?
    };

    let locations: Vec<InstallLocation> = match game {
        Some(game) => game.split(LIST_DELIMITER).map(InstallLocation::from_game).collect(),
        None => vec![InstallLocation::ModLibs; file_names.len()],
    };

    if file_names.len() != locations.len() {
        return Err(ManifestError::LengthMismatch {
            element: element.to_string(),
            files: file_names.len(),
            locations: locations.len(),
        });
    }

    Ok(file_names
        .into_iter()
        .zip(locations)
        .map(|(file_name, install_location)| InstalledModFile {
            file_name,
            install_location,
        })
        .collect())
}

fn validate_file_name(name: &str) -> Result<String, ManifestError> {
    let name = name.trim();
    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\']);
    if is_plain {
        Ok(name.to_string())
    } else {
        Err(ManifestError::InvalidFileName(name.to_string()))
    }
}

fn parse_bool(attribute: &str, value: Option<&str>) -> Result<bool, ManifestError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ManifestError::InvalidAttribute {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_version(value: Option<&str>) -> Result<Option<ModVersion>, ManifestError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some),
    }
}
