// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Module-name extraction from the resolved dependency set.
//!
//! The classifier only consumes the [`ModuleAnalyzer`] trait; [`JarAnalyzer`]
//! is the shipped implementation. It reads `Automatic-Module-Name` from jar
//! manifests, detects bundled `module-info.class` entries, and falls back to
//! the filename-derivation rule of the module system. Files that cannot be
//! inspected become path exceptions, never hard failures.

use crate::modules::model::{
    JavaModuleDescriptor, ModuleNameSource, ModuleReference, derive_module_name,
};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

const MODULE_INFO_CLASS: &str = "module-info.class";
const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
const AUTOMATIC_MODULE_NAME: &str = "Automatic-Module-Name";

/// Result of analyzing the resolved dependency set.
///
/// `path_elements` preserves the resolver's insertion order; the module-path
/// and classpath subsets are only populated for modular projects, the
/// classifier partitions the rest.
#[derive(Debug, Default)]
pub struct PathAnalysis {
    pub main_descriptor: Option<JavaModuleDescriptor>,
    pub path_elements: Vec<(PathBuf, Option<ModuleReference>)>,
    pub module_path: Vec<(PathBuf, ModuleNameSource)>,
    pub class_path: Vec<PathBuf>,
    pub path_exceptions: Vec<(PathBuf, String)>,
}

/// Extracts module names from a set of resolved dependency files.
pub trait ModuleAnalyzer {
    /// Analyze every file (the project output directory comes first), given
    /// the main module descriptor when the project is modular.
    fn analyze(
        &self,
        files: &[PathBuf],
        main_descriptor: Option<JavaModuleDescriptor>,
    ) -> PathAnalysis;
}

/// Checks whether a compiled module descriptor exists below the output
/// directory, which decides the modular/non-modular split.
pub fn has_module_descriptor(output_dir: &Path) -> bool {
    output_dir.join(MODULE_INFO_CLASS).is_file()
}

#[derive(Debug, Default)]
pub struct JarAnalyzer;

impl JarAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn inspect(&self, path: &Path) -> Result<Option<ModuleReference>, String> {
        if !path.exists() {
            return Err("file not found".to_string());
        }

        if path.is_dir() {
            // Directory module names come from the main descriptor, handled
            // by the caller. Other directories stay unnamed.
            return Ok(None);
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| "file has no name".to_string())?;

        let file = File::open(path).map_err(|e| e.to_string())?;
        let mut archive = ZipArchive::new(file).map_err(|e| e.to_string())?;

        let has_descriptor = archive.by_name(MODULE_INFO_CLASS).is_ok();
        let automatic_name = manifest_module_name(&mut archive)?;

        if has_descriptor {
            // The bundled descriptor wins. Reading the declared name would
            // need a class-file parser, the derived name matches it for the
            // artifacts we care about (javafx-base-17.jar -> javafx.base).
            let name = derive_module_name(&file_name);
            debug!("{file_name}: bundled module descriptor, using name {name}");
            return Ok(Some(ModuleReference {
                name,
                source: ModuleNameSource::ModuleDescriptor,
            }));
        }

        if let Some(name) = automatic_name {
            debug!("{file_name}: Automatic-Module-Name {name}");
            return Ok(Some(ModuleReference {
                name,
                source: ModuleNameSource::Manifest,
            }));
        }

        let name = derive_module_name(&file_name);
        debug!("{file_name}: filename-derived module name {name}");
        Ok(Some(ModuleReference {
            name,
            source: ModuleNameSource::Filename,
        }))
    }
}

impl ModuleAnalyzer for JarAnalyzer {
    fn analyze(
        &self,
        files: &[PathBuf],
        main_descriptor: Option<JavaModuleDescriptor>,
    ) -> PathAnalysis {
        let mut analysis = PathAnalysis {
            main_descriptor,
            ..Default::default()
        };

        for (index, file) in files.iter().enumerate() {
            // The first element is the project's own compiled output; for a
            // modular project it carries the main descriptor's name.
            if index == 0
                && file.is_dir()
                && let Some(descriptor) = &analysis.main_descriptor
            {
                let reference = ModuleReference {
                    name: descriptor.name.clone(),
                    source: ModuleNameSource::ModuleDescriptor,
                };
                analysis
                    .path_elements
                    .push((file.clone(), Some(reference.clone())));
                analysis
                    .module_path
                    .push((file.clone(), reference.source));
                continue;
            }

            match self.inspect(file) {
                Ok(reference) => {
                    analysis.path_elements.push((file.clone(), reference.clone()));
                    if analysis.main_descriptor.is_some() {
                        match reference {
                            Some(r) => analysis.module_path.push((file.clone(), r.source)),
                            None => analysis.class_path.push(file.clone()),
                        }
                    }
                }
                Err(message) => {
                    analysis.path_exceptions.push((file.clone(), message));
                }
            }
        }

        analysis
    }
}

fn manifest_module_name(archive: &mut ZipArchive<File>) -> Result<Option<String>, String> {
    let mut manifest = String::new();
    match archive.by_name(MANIFEST_PATH) {
        Ok(mut entry) => {
            entry
                .read_to_string(&mut manifest)
                .map_err(|e| e.to_string())?;
        }
        Err(_) => return Ok(None),
    }

    // Manifest values wrap at 72 bytes, a continuation line starts with a
    // single space.
    let unfolded = manifest.replace("\r\n", "\n").replace("\n ", "");
    for line in unfolded.lines() {
        if let Some(value) = line.strip_prefix(AUTOMATIC_MODULE_NAME)
            && let Some(value) = value.strip_prefix(':')
        {
            let value = value.trim();
            if !value.is_empty() {
                return Ok(Some(value.to_string()));
            }
        }
    }
    Ok(None)
}
