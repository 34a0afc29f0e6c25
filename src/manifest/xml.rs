//! Raw `modinfo.xml` document, as deserialized by quick-xml.
//!
//! Every attribute is kept as an optional string; typing and validation happen
//! in the parent module so errors can name the offending attribute.

use serde::Deserialize;

/// Root `<mod>` element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModInfoXml {
    #[serde(rename = "@displayName", default)]
    pub display_name: Option<String>,

    #[serde(rename = "@unique", default)]
    pub unique: Option<String>,

    #[serde(rename = "@description", default)]
    pub description: Option<String>,

    #[serde(rename = "@isExperimental", default)]
    pub is_experimental: Option<String>,

    #[serde(rename = "@requiresGalaxyReset", default)]
    pub requires_galaxy_reset: Option<String>,

    #[serde(rename = "@causesSaveDataDependency", default)]
    pub causes_save_data_dependency: Option<String>,

    #[serde(rename = "@installerSystemVersion", default)]
    pub installer_system_version: Option<String>,

    #[serde(rename = "@dllsBuild", default)]
    pub dlls_build: Option<String>,

    #[serde(rename = "componentGroup", default)]
    pub component_groups: Vec<ComponentGroupXml>,

    #[serde(rename = "component", default)]
    pub components: Vec<ComponentXml>,

    #[serde(rename = "prerequisite", default)]
    pub prerequisites: Vec<FilesXml>,

    #[serde(rename = "compatFile", default)]
    pub compat_files: Vec<CompatFileXml>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentGroupXml {
    #[serde(rename = "@displayName", default)]
    pub display_name: Option<String>,

    #[serde(rename = "@unique", default)]
    pub unique: Option<String>,

    #[serde(rename = "component", default)]
    pub components: Vec<ComponentXml>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentXml {
    #[serde(rename = "@displayName", default)]
    pub display_name: Option<String>,

    #[serde(rename = "@unique", default)]
    pub unique: Option<String>,

    #[serde(rename = "@description", default)]
    pub description: Option<String>,

    #[serde(rename = "@defaultChecked", default)]
    pub default_checked: Option<String>,

    #[serde(rename = "@game", default)]
    pub game: Option<String>,

    #[serde(rename = "$text", default)]
    pub files: String,
}

/// `<prerequisite game="...">a?b</prerequisite>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilesXml {
    #[serde(rename = "@game", default)]
    pub game: Option<String>,

    #[serde(rename = "$text", default)]
    pub files: String,
}

/// `<compatFile compatTargetGame="..." compatTargetFileName="..." game="...">a?b</compatFile>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompatFileXml {
    #[serde(rename = "@compatTargetGame", default)]
    pub target_game: Option<String>,

    #[serde(rename = "@compatTargetFileName", default)]
    pub target_files: Option<String>,

    #[serde(rename = "@game", default)]
    pub game: Option<String>,

    #[serde(rename = "$text", default)]
    pub files: String,
}
