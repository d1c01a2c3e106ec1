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

use crate::commands::{env_snapshot, prepare_paths, working_directory};
use crate::config::FxConfig;
use crate::error::{FxError, Result};
use crate::exec::{ExecutableResolver, is_java8_target, qualify_main_class};
use crate::platform::file_ops::{copy_tree, make_executable};
use crate::platform::path_separator;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Subdirectory of the package that receives every copied dependency.
const MODULES_DIR: &str = "modules";

pub struct PackageCommand<'a> {
    config: &'a FxConfig,
}

impl<'a> PackageCommand<'a> {
    pub fn new(config: &'a FxConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        if self.config.project.skip {
            info!("skipping execute as per configuration");
            return Ok(());
        }

        let working_dir = working_directory(self.config)?;
        let env = env_snapshot();
        let resolver = ExecutableResolver::new(
            &env,
            &working_dir,
            self.config.project.jdk_home.as_deref(),
        );
        let java = resolver.resolve(&self.config.packaging.executable);
        let old_jdk = is_java8_target(&java, &working_dir);

        let output = PathBuf::from(&self.config.packaging.directory);
        if output.exists() {
            if !output.is_dir() {
                return Err(FxError::PackageCreate(format!(
                    "Existing output {} is not a directory",
                    output.display()
                )));
            }
        } else {
            fs::create_dir_all(&output)
                .map_err(|_| FxError::DirectoryCreation(output.display().to_string()))?;
        }

        let classification = prepare_paths(self.config)?;

        // Each segment below starts with its own separating space, so the
        // script stays well-formed whichever blocks apply.
        let mut script = String::from("#!/bin/bash\njava");
        for option in &self.config.run.options {
            script.push(' ');
            script.push_str(option);
        }

        if old_jdk {
            // Pre-module-system launch: every dependency on the classpath.
            let all: Vec<PathBuf> = classification
                .module_path
                .iter()
                .chain(&classification.class_path)
                .cloned()
                .collect();
            if !all.is_empty() {
                script.push_str(" -classpath ");
                script.push_str(&self.copy_dependencies(&all, &output)?);
            }
        } else {
            if !classification.module_path.is_empty() {
                script.push_str(" --module-path ");
                script.push_str(&self.copy_dependencies(&classification.module_path, &output)?);

                script.push_str(" --add-modules ");
                match &classification.main_descriptor {
                    Some(descriptor) => script.push_str(&descriptor.name),
                    None => script.push_str(&classification.javafx_module_names().join(",")),
                }
            }

            if !classification.class_path.is_empty() {
                script.push_str(" -classpath ");
                script.push_str(&self.copy_dependencies(&classification.class_path, &output)?);
            }
        }

        match &classification.main_descriptor {
            Some(descriptor) => {
                script.push_str(" --module ");
                script.push_str(&qualify_main_class(
                    &self.config.project.main_class,
                    &descriptor.name,
                ));
            }
            None => {
                script.push(' ');
                script.push_str(&self.config.project.main_class);
            }
        }

        if let Some(args) = &self.config.run.commandline_args {
            script.push(' ');
            script.push_str(args);
        }
        script.push('\n');

        let script_path = output.join("script.sh");
        debug!("Writing launch script {}", script_path.display());
        fs::write(&script_path, &script)
            .map_err(|e| FxError::PackageCreate(e.to_string()))?;
        make_executable(&script_path).map_err(|e| FxError::PackageCreate(e.to_string()))?;

        info!("Package created in {}", output.display());
        Ok(())
    }

    /// Copy every dependency into `<output>/modules/` and render the
    /// corresponding script path list: the copied absolute paths, or
    /// `modules/<basename>` entries relative to the script.
    fn copy_dependencies(&self, elements: &[PathBuf], output: &Path) -> Result<String> {
        let destination_dir = output.join(MODULES_DIR);
        fs::create_dir_all(&destination_dir)
            .map_err(|_| FxError::DirectoryCreation(destination_dir.display().to_string()))?;

        let mut entries = Vec::with_capacity(elements.len());
        for element in elements {
            let basename = element
                .file_name()
                .ok_or_else(|| {
                    FxError::PackageCreate(format!("No file name in {}", element.display()))
                })?
                .to_string_lossy()
                .to_string();
            let destination = destination_dir.join(&basename);

            if element.is_dir() {
                copy_tree(element, &destination)?;
            } else {
                fs::copy(element, &destination).map_err(|e| FxError::Copy {
                    source_path: element.display().to_string(),
                    destination: destination.display().to_string(),
                    source: e,
                })?;
            }

            if self.config.packaging.absolute {
                entries.push(std::path::absolute(&destination)?.display().to_string());
            } else {
                entries.push(format!("{MODULES_DIR}/{basename}"));
            }
        }
        Ok(entries.join(&path_separator().to_string()))
    }
}
