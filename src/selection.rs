//! Turns a manifest plus the user's answers into the list of files to install.

use anyhow::Result;
use log::debug;
use std::io::{BufRead, Write};

use crate::error::ModError;
use crate::location::Locations;
use crate::manifest::{Component, ComponentGroup, ModManifest};
use crate::registry::{InstalledMod, InstalledModFile};
use crate::runtime::{Console, Runtime};

/// Accumulates file placements in order and hands them out once.
///
/// A placement that is already planned (same location, file name compared
/// case-insensitively) is skipped.
#[derive(Debug, Default)]
pub struct FilePlanBuilder {
    files: Vec<InstalledModFile>,
}

impl FilePlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file: &InstalledModFile) {
        let planned = self.files.iter().any(|f| {
            f.install_location == file.install_location
                && f.file_name.eq_ignore_ascii_case(&file.file_name)
        });
        if planned {
            debug!("Skipping duplicate placement of {}", file.file_name);
        } else {
            self.files.push(file.clone());
        }
    }

    pub fn extend<'a>(&mut self, files: impl IntoIterator<Item = &'a InstalledModFile>) {
        for file in files {
            self.add(file);
        }
    }

    pub fn build(self) -> Vec<InstalledModFile> {
        self.files
    }
}

/// A manifest with every choice made.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMod {
    pub name: String,
    pub unique_name: String,
    pub description: String,
    pub files: Vec<InstalledModFile>,
}

impl From<ResolvedMod> for InstalledMod {
    fn from(resolved: ResolvedMod) -> Self {
        InstalledMod {
            name: resolved.name,
            unique_name: resolved.unique_name,
            description: resolved.description,
            files: resolved.files,
        }
    }
}

pub struct SelectionEngine<'a, R: Runtime> {
    runtime: &'a R,
    locations: &'a Locations,
    assume_yes: bool,
}

impl<'a, R: Runtime> SelectionEngine<'a, R> {
    pub fn new(runtime: &'a R, locations: &'a Locations, assume_yes: bool) -> Self {
        Self {
            runtime,
            locations,
            assume_yes,
        }
    }

    /// Ask the user for every choice the manifest leaves open.
    ///
    /// Files are planned in this order: the chosen component of each group,
    /// the chosen standalone components, prerequisites, then compat files
    /// whose targets are installed.
    #[tracing::instrument(
        skip(self, manifest, console),
        fields(unique_name = %manifest.unique_name)
    )]
    pub fn resolve<I: BufRead, O: Write>(
        &self,
        manifest: &ModManifest,
        console: &mut Console<I, O>,
    ) -> Result<ResolvedMod> {
        self.confirm_warnings(manifest, console)?;

        let mut plan = FilePlanBuilder::new();

        for group in &manifest.component_groups {
            if let Some(component) = choose_from_group(group, console)? {
                plan.extend(&component.files);
            }
        }

        if !manifest.components.is_empty() {
            for component in choose_components(&manifest.components, console)? {
                plan.extend(&component.files);
            }
        }

        for prerequisite in &manifest.prerequisites {
            plan.extend(&prerequisite.files);
        }

        for compat in &manifest.compat_files {
            if compat.required.iter().all(|f| self.is_installed(f)) {
                plan.extend(&compat.files);
            } else {
                debug!("Skipping compat files, target not installed");
            }
        }

        Ok(ResolvedMod {
            name: manifest.display_name.clone(),
            unique_name: manifest.unique_name.clone(),
            description: manifest.description.clone(),
            files: plan.build(),
        })
    }

    fn confirm_warnings<I: BufRead, O: Write>(
        &self,
        manifest: &ModManifest,
        console: &mut Console<I, O>,
    ) -> Result<()> {
        let warnings = [
            (manifest.is_experimental, "-> This mod is experimental"),
            (manifest.requires_galaxy_reset, "-> This mod requires a galaxy reset"),
            (
                manifest.causes_save_data_dependency,
                "-> This mod causes save data dependency",
            ),
        ];

        for (_, text) in warnings.iter().filter(|(set, _)| *set) {
            console.say(text)?;
            if self.assume_yes {
                continue;
            }
            if !console.confirm("-> Are you sure you want to continue?")? {
                return Err(ModError::Cancelled(manifest.display_name.clone()).into());
            }
        }
        Ok(())
    }

    fn is_installed(&self, file: &InstalledModFile) -> bool {
        let path = self.locations.file_path(file.install_location, &file.file_name);
        self.runtime.is_file(&path)
    }
}

fn list_component<I: BufRead, O: Write>(
    console: &mut Console<I, O>,
    index: usize,
    component: &Component,
) -> Result<()> {
    let marker = if component.default_checked {
        " (recommended)"
    } else {
        ""
    };
    console.say(&format!("[{}] {}{}", index, component.display_name, marker))?;
    if !component.description.trim().is_empty() {
        console.say(&format!("  {}", component.description))?;
    }
    Ok(())
}

/// Exactly one component of a non-empty group; re-prompts until the answer is valid.
fn choose_from_group<'m, I: BufRead, O: Write>(
    group: &'m ComponentGroup,
    console: &mut Console<I, O>,
) -> Result<Option<&'m Component>> {
    if group.components.is_empty() {
        debug!("Skipping empty component group {}", group.unique_name);
        return Ok(None);
    }

    console.say(&format!("-> {}", group.display_name))?;
    for (index, component) in group.components.iter().enumerate() {
        list_component(console, index, component)?;
    }

    loop {
        let answer = console.ask("-> select which component you want: ")?;
        match parse_choice(&answer, group.components.len()) {
            Some(index) => return Ok(Some(&group.components[index])),
            None => console.say("Invalid input, try again")?,
        }
    }
}

/// Any subset of the standalone components, as one comma separated line.
fn choose_components<'m, I: BufRead, O: Write>(
    components: &'m [Component],
    console: &mut Console<I, O>,
) -> Result<Vec<&'m Component>> {
    for (index, component) in components.iter().enumerate() {
        list_component(console, index, component)?;
    }

    loop {
        let answer = console.ask(
            "-> select which components you want to install (comma separated, empty for none): ",
        )?;
        match parse_selection(&answer, components.len()) {
            Some(ids) => return Ok(ids.into_iter().map(|i| &components[i]).collect()),
            None => console.say("Invalid input, try again")?,
        }
    }
}

fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    answer.trim().parse().ok().filter(|&index| index < count)
}

/// Parse a comma separated index list. A single bad token rejects the whole line.
fn parse_selection(answer: &str, count: usize) -> Option<Vec<usize>> {
    let mut ids = Vec::new();
    for token in answer.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let index = parse_choice(token, count)?;
        if !ids.contains(&index) {
            ids.push(index);
        }
    }
    Some(ids)
}
