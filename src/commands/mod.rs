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

pub mod compile;
pub mod jlink;
pub mod package;
pub mod run;

pub use compile::CompileCommand;
pub use jlink::JlinkCommand;
pub use package::PackageCommand;
pub use run::RunCommand;

use crate::config::FxConfig;
use crate::error::{FxError, Result};
use crate::modules::{
    ClassificationResult, JarAnalyzer, ModuleAnalyzer, classify, has_module_descriptor,
};
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;

/// Snapshot of the process environment, passed explicitly to children so a
/// goal never depends on ambient mutation after startup.
pub(crate) fn env_snapshot() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// The directory children run in. Created when missing.
pub(crate) fn working_directory(config: &FxConfig) -> Result<PathBuf> {
    let dir = match &config.project.working_directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    if !dir.exists() {
        debug!("Making working directory '{}'", dir.display());
        std::fs::create_dir_all(&dir)
            .map_err(|_| FxError::WorkingDirectory(dir.display().to_string()))?;
    }
    Ok(dir)
}

/// Analyze and classify the project output directory plus every resolved
/// dependency. The output directory must already hold compiled classes.
pub(crate) fn prepare_paths(config: &FxConfig) -> Result<ClassificationResult> {
    let output_dir = &config.project.output_dir;
    if !output_dir.is_dir() || output_dir.read_dir()?.next().is_none() {
        return Err(FxError::OutputDirectoryMissing(
            output_dir.display().to_string(),
        ));
    }

    let main_descriptor = if has_module_descriptor(output_dir) {
        match &config.module {
            Some(descriptor) => Some(descriptor.clone()),
            None => {
                return Err(FxError::InvalidConfig(
                    "module-info.class found in the output directory but the [module] \
                     section is missing"
                        .to_string(),
                ));
            }
        }
    } else {
        None
    };

    let mut files = Vec::with_capacity(config.project.dependencies.len() + 1);
    files.push(output_dir.clone());
    files.extend(config.project.dependencies.iter().cloned());

    let analysis = JarAnalyzer::new().analyze(&files, main_descriptor);
    classify(
        analysis,
        config.runtime_path_mode(),
        config.project.include_path_exceptions_in_classpath,
        &config.project.main_class,
        config.project.main_class_extends_application,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn config_with_output(output_dir: &std::path::Path) -> FxConfig {
        let mut config = FxConfig::default();
        config.project.main_class = "com.example.App".to_string();
        config.project.output_dir = output_dir.to_path_buf();
        config
    }

    #[test]
    fn test_prepare_paths_rejects_missing_output_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = config_with_output(&temp.path().join("does-not-exist"));
        assert!(matches!(
            prepare_paths(&config).unwrap_err(),
            FxError::OutputDirectoryMissing(_)
        ));
    }

    #[test]
    fn test_prepare_paths_rejects_empty_output_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = config_with_output(temp.path());
        assert!(matches!(
            prepare_paths(&config).unwrap_err(),
            FxError::OutputDirectoryMissing(_)
        ));
    }

    #[test]
    fn test_prepare_paths_requires_module_section_for_descriptor() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("module-info.class"), b"\xca\xfe\xba\xbe").unwrap();
        let config = config_with_output(temp.path());
        assert!(matches!(
            prepare_paths(&config).unwrap_err(),
            FxError::InvalidConfig(_)
        ));
    }

    #[test]
    fn test_prepare_paths_non_modular_project() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("App.class"), b"\xca\xfe\xba\xbe").unwrap();
        let config = config_with_output(temp.path());
        let result = prepare_paths(&config).unwrap();
        assert!(result.main_descriptor.is_none());
        assert_eq!(result.class_path, vec![temp.path().to_path_buf()]);
    }

    #[test]
    #[serial]
    fn test_env_snapshot_tracks_process_environment() {
        // Save and set environment variable
        let original = env::var("FXBUILD_TEST_MARKER").ok();
        unsafe {
            env::set_var("FXBUILD_TEST_MARKER", "on");
        }

        let snapshot = env_snapshot();
        assert_eq!(
            snapshot.get("FXBUILD_TEST_MARKER").map(String::as_str),
            Some("on")
        );

        unsafe {
            env::remove_var("FXBUILD_TEST_MARKER");
        }
        // a fresh snapshot sees the removal; the old one is unaffected
        assert!(!env_snapshot().contains_key("FXBUILD_TEST_MARKER"));
        assert!(snapshot.contains_key("FXBUILD_TEST_MARKER"));

        // Restore environment
        unsafe {
            if let Some(val) = original {
                env::set_var("FXBUILD_TEST_MARKER", val);
            }
        }
    }

    #[test]
    fn test_working_directory_is_created() {
        let temp = tempfile::TempDir::new().unwrap();
        let target = temp.path().join("nested").join("work");
        let mut config = FxConfig::default();
        config.project.working_directory = Some(target.clone());
        let dir = working_directory(&config).unwrap();
        assert_eq!(dir, target);
        assert!(target.is_dir());
    }
}
