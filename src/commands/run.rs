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
use crate::exec::{
    CommandSpec, CompatMode, ExecutableResolver, LaunchOptions, OutputSink, ProcessRunner,
    build_launch_args, is_java8_target,
};
use log::{debug, info};

pub struct RunCommand<'a> {
    config: &'a FxConfig,
}

impl<'a> RunCommand<'a> {
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
        let java = resolver.resolve(&self.config.run.executable);

        let compat = if is_java8_target(&java, &working_dir) {
            debug!("Target JVM predates the module system");
            CompatMode::Java8
        } else {
            CompatMode::Modern
        };

        let classification = prepare_paths(self.config)?;
        let args = build_launch_args(
            &classification,
            &LaunchOptions {
                main_class: &self.config.project.main_class,
                output_dir: &self.config.project.output_dir,
                vm_options: &self.config.run.options,
                command_line_args: self.config.run.commandline_args.as_deref(),
                compat,
            },
        );

        let spec = CommandSpec::new(java, args, working_dir, env);
        let command_line = spec.command_line();
        debug!("Executing command line: {command_line}");

        let sink = match &self.config.run.output_file {
            Some(file) => OutputSink::File(file.clone()),
            None => OutputSink::Inherit,
        };

        let mut runner = ProcessRunner::new(
            self.config.run.r#async,
            self.config.run.async_destroy_on_shutdown,
        );
        let exit_code = runner.run(spec, &sink)?;
        if exit_code != 0 {
            return Err(FxError::CommandFailed {
                command: command_line,
                exit_code,
            });
        }
        Ok(())
    }
}
