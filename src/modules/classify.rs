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

use crate::error::{FxError, Result};
use crate::modules::analyzer::PathAnalysis;
use crate::modules::model::{
    JAVAFX_MODULE_PREFIX, JavaModuleDescriptor, ModuleNameSource, ModuleReference, RuntimePathMode,
};
use log::{debug, info, warn};
use std::path::PathBuf;

/// The immutable outcome of path classification.
///
/// Every input dependency lands in exactly one of `module_path`/`class_path`
/// unless it was dropped as a path exception. Both lists preserve the
/// resolver's insertion order so regenerated command lines stay diffable.
#[derive(Debug, Default)]
pub struct ClassificationResult {
    pub module_path: Vec<PathBuf>,
    pub class_path: Vec<PathBuf>,
    pub path_elements: Vec<(PathBuf, Option<ModuleReference>)>,
    pub main_descriptor: Option<JavaModuleDescriptor>,
}

impl ClassificationResult {
    /// The `javafx.*` module names found among the path elements, used for
    /// `--add-modules` when the project has no descriptor of its own.
    /// Placeholder modules named `...Empty` are excluded.
    pub fn javafx_module_names(&self) -> Vec<String> {
        self.path_elements
            .iter()
            .filter_map(|(_, reference)| reference.as_ref())
            .filter(|r| r.name.starts_with(JAVAFX_MODULE_PREFIX) && !r.name.ends_with("Empty"))
            .map(|r| r.name.clone())
            .collect()
    }
}

/// Partition the analyzed dependency set into module path and classpath.
///
/// `main_class_extends_application` is a fact supplied by the caller's
/// metadata (never determined by loading user code); it only matters in
/// forced-classpath mode, where launching an Application subclass directly
/// cannot work.
pub fn classify(
    analysis: PathAnalysis,
    mode: RuntimePathMode,
    include_path_exceptions: bool,
    main_class: &str,
    main_class_extends_application: bool,
) -> Result<ClassificationResult> {
    if mode == RuntimePathMode::Modulepath && analysis.main_descriptor.is_none() {
        return Err(FxError::ModuleDescriptorRequired);
    }

    let mut module_path: Vec<(PathBuf, ModuleNameSource)> = analysis.module_path;
    let mut class_path: Vec<PathBuf> = analysis.class_path;

    if !analysis.path_exceptions.is_empty() {
        for (file, message) in &analysis.path_exceptions {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.display().to_string());
            warn!("Can't extract module name from {name}: {message}");
        }
        if include_path_exceptions {
            class_path.extend(analysis.path_exceptions.iter().map(|(f, _)| f.clone()));
        } else {
            warn!(
                "Some dependencies encountered issues while attempting to be resolved as modules \
                 and will not be included in the classpath; you can change this behavior via the \
                 'includePathExceptionsInClasspath' configuration parameter."
            );
        }
    }

    if analysis.main_descriptor.is_none() {
        // Non-modular project: only the JavaFX runtime goes on the module
        // path, so the launcher can --add-modules it. Everything else stays
        // on the classpath.
        for (path, reference) in &analysis.path_elements {
            match reference {
                Some(r) if r.name.starts_with(JAVAFX_MODULE_PREFIX) => {
                    module_path.push((path.clone(), r.source));
                }
                _ => class_path.push(path.clone()),
            }
        }
    }

    match mode {
        RuntimePathMode::Auto => {}
        RuntimePathMode::Modulepath => {
            for path in class_path.drain(..) {
                module_path.push((path, ModuleNameSource::ModuleDescriptor));
            }
        }
        RuntimePathMode::Classpath => {
            if main_class_extends_application {
                return Err(FxError::LauncherRequired {
                    main_class: main_class.to_string(),
                });
            }
            // Rebuild from the resolver's input order instead of
            // concatenating the two partitions; opted-in path exceptions
            // keep their trailing position.
            module_path.clear();
            let mut merged: Vec<PathBuf> = analysis
                .path_elements
                .iter()
                .map(|(path, _)| path.clone())
                .collect();
            for path in class_path.drain(..) {
                if !merged.contains(&path) {
                    merged.push(path);
                }
            }
            class_path = merged;
        }
    }

    let main_descriptor = if mode == RuntimePathMode::Classpath {
        // Module information is discarded for command building.
        None
    } else {
        analysis.main_descriptor
    };

    if module_path
        .iter()
        .any(|(_, source)| *source == ModuleNameSource::Filename)
    {
        let message = "Required filename-based automodules detected. Please don't publish this \
                       project to a public artifact repository!";
        match &main_descriptor {
            Some(descriptor) if descriptor.is_application() => info!("{message}"),
            _ => warn!("{message}"),
        }
    }

    let result = ClassificationResult {
        module_path: module_path.into_iter().map(|(p, _)| p).collect(),
        class_path,
        path_elements: analysis.path_elements,
        main_descriptor,
    };

    debug!("Modulepath: {}", result.module_path.len());
    for path in &result.module_path {
        debug!(" {}", path.display());
    }
    debug!("Classpath: {}", result.class_path.len());
    for path in &result.class_path {
        debug!(" {}", path.display());
    }

    Ok(result)
}
