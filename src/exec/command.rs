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

//! Synthesis of the literal `java`/`jlink` argument vectors.

use crate::args::tokenize;
use crate::error::{FxError, Result};
use crate::modules::ClassificationResult;
use crate::platform::{comspec, has_batch_extension, has_native_extension, is_windows,
    path_separator};
use log::warn;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A fully assembled child-process invocation. Built once, immutable,
/// consumed exactly once by the runner.
#[derive(Debug)]
pub struct CommandSpec {
    pub executable: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub env: HashMap<String, String>,
}

impl CommandSpec {
    /// Wrap a resolved executable. A Windows batch script is not launched
    /// directly but through `cmd /c` (or `%ComSpec% /c`), direct invocation
    /// of batch files from a non-shell launcher is unreliable.
    pub fn new(
        resolved: String,
        args: Vec<String>,
        working_dir: PathBuf,
        env: HashMap<String, String>,
    ) -> Self {
        let (executable, mut leading) = batch_indirection(resolved, &env, is_windows());
        leading.extend(args);
        Self {
            executable,
            args: leading,
            working_dir,
            env,
        }
    }

    /// The literal command line, for diagnostics and failure messages.
    pub fn command_line(&self) -> String {
        let mut line = self.executable.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

fn batch_indirection(
    resolved: String,
    env: &HashMap<String, String>,
    windows: bool,
) -> (String, Vec<String>) {
    if windows && !has_native_extension(&resolved) && has_batch_extension(&resolved, env) {
        (comspec(env), vec!["/c".to_string(), resolved])
    } else {
        (resolved, Vec::new())
    }
}

/// Whether the target JVM understands module flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompatMode {
    Modern,
    /// Pre-module-system JVM: no `--module-path`, `--add-modules` or
    /// `--module`, main class passed positionally.
    Java8,
}

pub struct LaunchOptions<'a> {
    pub main_class: &'a str,
    /// The project's compiled-output directory, prefixed onto the classpath
    /// for modular projects and in Java 8 mode.
    pub output_dir: &'a Path,
    pub vm_options: &'a [String],
    pub command_line_args: Option<&'a str>,
    pub compat: CompatMode,
}

/// Assemble the `java` argument vector for launching the application.
pub fn build_launch_args(
    classification: &ClassificationResult,
    options: &LaunchOptions<'_>,
) -> Vec<String> {
    let separator = path_separator().to_string();
    let mut args: Vec<String> = options.vm_options.iter().flat_map(|o| tokenize(o)).collect();

    let descriptor = classification.main_descriptor.as_ref();

    if options.compat == CompatMode::Modern {
        if !classification.module_path.is_empty() {
            args.push("--module-path".to_string());
            args.push(join_paths(&classification.module_path, &separator));

            args.push("--add-modules".to_string());
            match descriptor {
                Some(d) => args.push(d.name.clone()),
                None => args.push(classification.javafx_module_names().join(",")),
            }
        }

        if !classification.class_path.is_empty() {
            args.push("-classpath".to_string());
            let mut classpath = String::new();
            if descriptor.is_some() {
                classpath.push_str(&options.output_dir.display().to_string());
                classpath.push_str(&separator);
            }
            classpath.push_str(&join_paths(&classification.class_path, &separator));
            args.push(classpath);
        }

        match descriptor {
            Some(d) => {
                args.push("--module".to_string());
                args.push(qualify_main_class(options.main_class, &d.name));
            }
            None => args.push(options.main_class.to_string()),
        }
    } else {
        // Java 8: every dependency is a plain classpath entry and the
        // compiled output comes first.
        args.push("-classpath".to_string());
        let mut classpath = options.output_dir.display().to_string();
        for path in classification
            .module_path
            .iter()
            .chain(&classification.class_path)
        {
            classpath.push_str(&separator);
            classpath.push_str(&path.display().to_string());
        }
        args.push(classpath);
        args.push(options.main_class.to_string());
    }

    if let Some(raw) = options.command_line_args {
        args.extend(tokenize(raw));
    }

    args
}

/// Qualify the main class with the module name unless the caller already did.
pub fn qualify_main_class(main_class: &str, module_name: &str) -> String {
    if let Some((qualifier, _)) = main_class.split_once('/') {
        if qualifier != module_name {
            warn!(
                "Main class '{main_class}' is qualified with module '{qualifier}' but the \
                 module descriptor is named '{module_name}'"
            );
        }
        main_class.to_string()
    } else {
        format!("{module_name}/{main_class}")
    }
}

pub struct JlinkOptions<'a> {
    pub main_class: &'a str,
    pub image_dir: &'a Path,
    pub jmods_path: Option<&'a str>,
    pub launcher: Option<&'a str>,
    pub strip_debug: bool,
    /// Only honored for jlink 13 and higher, the caller gates this flag on
    /// the probed version.
    pub strip_java_debug_attributes: bool,
    pub bind_services: bool,
    pub ignore_signing_information: bool,
    pub no_header_files: bool,
    pub no_man_pages: bool,
    pub verbose: bool,
    pub compress: u8,
}

/// Assemble the `jlink` argument vector. Validation happens here, before any
/// process is spawned.
pub fn build_jlink_args(
    classification: &ClassificationResult,
    options: &JlinkOptions<'_>,
) -> Result<Vec<String>> {
    if options.compress > 2 {
        return Err(FxError::InvalidCompressLevel(options.compress));
    }

    let mut args = Vec::new();
    let separator = path_separator().to_string();

    if !classification.module_path.is_empty() {
        let descriptor = classification
            .main_descriptor
            .as_ref()
            .ok_or_else(|| FxError::InvalidConfig("jlink requires a module descriptor".to_string()))?;

        args.push("--module-path".to_string());
        let mut module_path = join_paths(&classification.module_path, &separator);
        if let Some(jmods) = options.jmods_path.filter(|p| !p.is_empty()) {
            module_path = format!("{jmods}{separator}{module_path}");
        }
        args.push(module_path);

        args.push("--add-modules".to_string());
        args.push(descriptor.name.clone());
    }

    args.push("--output".to_string());
    args.push(options.image_dir.display().to_string());

    if options.strip_debug {
        args.push("--strip-debug".to_string());
    }
    if options.strip_java_debug_attributes {
        args.push("--strip-java-debug-attributes".to_string());
    }
    if options.bind_services {
        args.push("--bind-services".to_string());
    }
    if options.ignore_signing_information {
        args.push("--ignore-signing-information".to_string());
    }
    args.push("--compress".to_string());
    args.push(options.compress.to_string());
    if options.no_header_files {
        args.push("--no-header-files".to_string());
    }
    if options.no_man_pages {
        args.push("--no-man-pages".to_string());
    }
    if options.verbose {
        args.push("--verbose".to_string());
    }

    if let Some(launcher) = options.launcher.filter(|l| !l.is_empty()) {
        let module_main_class = if options.main_class.contains('/') {
            options.main_class.to_string()
        } else {
            let descriptor = classification
                .main_descriptor
                .as_ref()
                .ok_or_else(|| {
                    FxError::InvalidConfig("jlink launcher requires a module descriptor".to_string())
                })?;
            format!("{}/{}", descriptor.name, options.main_class)
        };
        args.push("--launcher".to_string());
        args.push(format!("{launcher}={module_main_class}"));
    }

    Ok(args)
}

fn join_paths(paths: &[PathBuf], separator: &str) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(separator)
}
