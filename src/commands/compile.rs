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

use crate::commands::{env_snapshot, working_directory};
use crate::config::FxConfig;
use crate::error::{FxError, Result};
use crate::exec::{CommandSpec, ExecutableResolver, OutputSink, ProcessRunner};
use crate::platform::path_separator;
use log::{debug, info};
use std::path::PathBuf;
use walkdir::WalkDir;

pub struct CompileCommand<'a> {
    config: &'a FxConfig,
}

impl<'a> CompileCommand<'a> {
    pub fn new(config: &'a FxConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        if self.config.project.skip {
            info!("skipping execute as per configuration");
            return Ok(());
        }

        let sources = self.collect_sources()?;
        if sources.is_empty() {
            info!(
                "No sources to compile in {}",
                self.config.project.source_dir.display()
            );
            return Ok(());
        }
        debug!("Compiling {} source files", sources.len());

        std::fs::create_dir_all(&self.config.project.output_dir)?;

        let working_dir = working_directory(self.config)?;
        let env = env_snapshot();
        let resolver = ExecutableResolver::new(
            &env,
            &working_dir,
            self.config.project.jdk_home.as_deref(),
        );
        let javac = resolver.resolve(&self.config.compile.executable);

        let mut args = Vec::new();
        args.push("-d".to_string());
        args.push(self.config.project.output_dir.display().to_string());

        if !self.config.project.dependencies.is_empty() {
            let joined = self
                .config
                .project
                .dependencies
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(&path_separator().to_string());
            // A module descriptor among the sources means the compiler reads
            // dependencies from the module path.
            if self.config.module.is_some() {
                args.push("--module-path".to_string());
            } else {
                args.push("-classpath".to_string());
            }
            args.push(joined);
        }

        match &self.config.compile.release {
            Some(release) => {
                args.push("--release".to_string());
                args.push(release.clone());
            }
            None => {
                args.push("-source".to_string());
                args.push(self.config.compile.source.clone());
                args.push("-target".to_string());
                args.push(self.config.compile.target.clone());
            }
        }

        args.extend(self.config.compile.compiler_args.iter().cloned());
        args.extend(sources.iter().map(|s| s.display().to_string()));

        let spec = CommandSpec::new(javac, args, working_dir, env);
        let command_line = spec.command_line();
        debug!("Executing command line: {command_line}");

        let mut runner = ProcessRunner::new(false, false);
        let exit_code = runner.run(spec, &OutputSink::Inherit)?;
        if exit_code != 0 {
            return Err(FxError::CommandFailed {
                command: command_line,
                exit_code,
            });
        }
        Ok(())
    }

    fn collect_sources(&self) -> Result<Vec<PathBuf>> {
        let source_dir = &self.config.project.source_dir;
        if !source_dir.is_dir() {
            return Ok(Vec::new());
        }
        let excludes = &self.config.compile.excludes;
        let mut sources = Vec::new();
        for entry in WalkDir::new(source_dir).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().is_none_or(|e| e != "java") {
                continue;
            }
            let rendered = path.display().to_string();
            if excludes.iter().any(|fragment| rendered.contains(fragment)) {
                debug!("Excluding source file {rendered}");
                continue;
            }
            sources.push(path.to_path_buf());
        }
        sources.sort();
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(temp: &TempDir) -> FxConfig {
        let mut config = FxConfig::default();
        config.project.main_class = "com.example.App".to_string();
        config.project.source_dir = temp.path().join("src");
        config.project.output_dir = temp.path().join("classes");
        config.project.working_directory = Some(temp.path().to_path_buf());
        config
    }

    #[test]
    fn test_no_sources_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let config = config_for(&temp);
        CompileCommand::new(&config).execute().unwrap();
        assert!(!config.project.output_dir.exists());
    }

    #[test]
    fn test_collect_sources_honors_excludes() {
        let temp = TempDir::new().unwrap();
        let mut config = config_for(&temp);
        let pkg = config.project.source_dir.join("com/example");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("App.java"), "class App {}").unwrap();
        fs::write(pkg.join("Skipped.java"), "class Skipped {}").unwrap();
        fs::write(pkg.join("notes.txt"), "not java").unwrap();
        config.compile.excludes = vec!["Skipped".to_string()];

        let sources = CompileCommand::new(&config).collect_sources().unwrap();
        assert_eq!(sources.len(), 1);
        assert!(sources[0].ends_with("App.java"));
    }
}
