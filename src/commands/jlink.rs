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
    CommandSpec, ExecutableResolver, JlinkOptions, OutputSink, ProcessRunner, build_jlink_args,
    is_java8_target, jlink_major_version,
};
use crate::platform::file_ops::remove_tree;
use log::{debug, error, info, warn};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub struct JlinkCommand<'a> {
    config: &'a FxConfig,
}

impl<'a> JlinkCommand<'a> {
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
        if is_java8_target(&java, &working_dir) {
            error!("jlink is not supported on Java 8");
            return Ok(());
        }

        let jlink = resolver.resolve(&self.config.jlink.executable);

        let mut strip_java_debug_attributes = self.config.jlink.strip_java_debug_attributes;
        if strip_java_debug_attributes
            && jlink_major_version(&jlink, &working_dir).is_none_or(|major| major < 13)
        {
            strip_java_debug_attributes = false;
            warn!("JLink parameter --strip-java-debug-attributes only supported for version 13 and higher");
            warn!("The option 'strip_java_debug_attributes' was skipped");
        }

        let classification = prepare_paths(self.config)?;

        let image_dir = self.config.project.build_dir.join(&self.config.jlink.image_name);
        debug!("image output: {}", image_dir.display());

        let args = build_jlink_args(
            &classification,
            &JlinkOptions {
                main_class: &self.config.project.main_class,
                image_dir: &image_dir,
                jmods_path: self.config.jlink.jmods_path.as_deref(),
                launcher: self.config.jlink.launcher.as_deref(),
                strip_debug: self.config.jlink.strip_debug,
                strip_java_debug_attributes,
                bind_services: self.config.jlink.bind_services,
                ignore_signing_information: self.config.jlink.ignore_signing_information,
                no_header_files: self.config.jlink.no_header_files,
                no_man_pages: self.config.jlink.no_man_pages,
                verbose: self.config.jlink.verbose,
                compress: self.config.jlink.compress,
            },
        )?;

        // jlink refuses to write into an existing image directory.
        remove_tree(&image_dir)?;

        let spec = CommandSpec::new(jlink, args, working_dir, env);
        let command_line = spec.command_line();
        debug!("Executing command line: {command_line}");

        let sink = match &self.config.jlink.output_file {
            Some(file) => OutputSink::File(file.clone()),
            None => OutputSink::Inherit,
        };
        let mut runner = ProcessRunner::new(false, false);
        let exit_code = runner.run(spec, &sink)?;
        if exit_code != 0 {
            return Err(FxError::CommandFailed {
                command: command_line,
                exit_code,
            });
        }

        if let Some(launcher) = self.config.jlink.launcher.as_deref().filter(|l| !l.is_empty()) {
            let launcher_path = image_dir.join("bin").join(launcher);
            patch_launcher_script(
                &launcher_path,
                &self.config.run.options,
                self.config.run.commandline_args.as_deref(),
            )?;
        }

        if let Some(zip_name) = self.config.jlink.zip_name.as_deref().filter(|z| !z.is_empty()) {
            debug!("Creating zip of runtime image");
            let archive = self
                .config
                .project
                .build_dir
                .join(format!("{zip_name}.zip"));
            zip_image(&image_dir, &archive)?;
            info!("Runtime image archived as {}", archive.display());
        }

        Ok(())
    }
}

/// Bake the configured VM options and program arguments into the launcher
/// script jlink generated. The script carries an empty `JLINK_VM_OPTIONS=`
/// line for exactly this purpose; program arguments go in front of `$@` so
/// callers can still append their own.
fn patch_launcher_script(
    launcher_path: &Path,
    vm_options: &[String],
    commandline_args: Option<&str>,
) -> Result<()> {
    if vm_options.is_empty() && commandline_args.is_none() {
        return Ok(());
    }

    let contents = fs::read_to_string(launcher_path)?;
    let mut lines: Vec<String> = contents.lines().map(|l| l.to_string()).collect();

    if !vm_options.is_empty() {
        let options = vm_options.join(" ");
        for line in &mut lines {
            if line == "JLINK_VM_OPTIONS=" {
                *line = format!("JLINK_VM_OPTIONS=\"{options}\"");
            }
        }
    }

    if let Some(args) = commandline_args {
        for line in &mut lines {
            if line.ends_with("$@") {
                *line = line.replace("$@", &format!("{args} $@"));
            }
        }
    }

    let mut patched = lines.join("\n");
    patched.push('\n');
    fs::write(launcher_path, patched)?;
    Ok(())
}

/// Zip the runtime image with paths relative to the image directory. Unix
/// permission bits are recorded per entry so `bin/java` and the launcher
/// script stay executable after extraction.
fn zip_image(image_dir: &Path, archive: &Path) -> Result<()> {
    if let Some(parent) = archive.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(archive)?;
    let mut writer = ZipWriter::new(file);

    for entry in WalkDir::new(image_dir) {
        let entry = entry?;
        #[allow(unused_mut)]
        let mut options = SimpleFileOptions::default();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            options = options.unix_permissions(entry.metadata()?.permissions().mode());
        }
        let relative: PathBuf = entry
            .path()
            .strip_prefix(image_dir)
            .map_err(|e| FxError::ValidationError(e.to_string()))?
            .to_path_buf();
        if relative.as_os_str().is_empty() {
            continue;
        }
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            let mut source = fs::File::open(entry.path())?;
            let mut buffer = Vec::new();
            source.read_to_end(&mut buffer)?;
            writer.write_all(&buffer)?;
        }
    }

    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zip::ZipArchive;

    #[test]
    fn test_patch_launcher_replaces_vm_options_line() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("hello");
        fs::write(
            &script,
            "#!/bin/sh\nJLINK_VM_OPTIONS=\nexec java $JLINK_VM_OPTIONS -m myapp/Main \"$@\"\n",
        )
        .unwrap();

        patch_launcher_script(&script, &["-Xmx512m".to_string()], Some("--fast")).unwrap();

        let patched = fs::read_to_string(&script).unwrap();
        assert!(patched.contains("JLINK_VM_OPTIONS=\"-Xmx512m\""));
        assert!(patched.contains("--fast $@"));
        // the caller's own arguments still reach the program
        assert!(patched.contains("$@"));
    }

    #[test]
    fn test_patch_launcher_without_changes_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("hello");
        fs::write(&script, "#!/bin/sh\nJLINK_VM_OPTIONS=\n").unwrap();
        patch_launcher_script(&script, &[], None).unwrap();
        assert_eq!(
            fs::read_to_string(&script).unwrap(),
            "#!/bin/sh\nJLINK_VM_OPTIONS=\n"
        );
    }

    #[test]
    fn test_zip_image_preserves_relative_layout() {
        let temp = TempDir::new().unwrap();
        let image = temp.path().join("image");
        fs::create_dir_all(image.join("bin")).unwrap();
        fs::write(image.join("bin/hello"), "#!/bin/sh\n").unwrap();
        fs::write(image.join("release"), "JAVA_VERSION=17\n").unwrap();

        let archive_path = temp.path().join("image.zip");
        zip_image(&image, &archive_path).unwrap();

        let mut archive = ZipArchive::new(fs::File::open(&archive_path).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.iter().any(|n| n == "bin/hello"));
        assert!(names.iter().any(|n| n == "release"));
    }

    #[test]
    #[cfg(unix)]
    fn test_zip_image_keeps_execute_bits() {
        use crate::platform::file_ops::make_executable;

        let temp = TempDir::new().unwrap();
        let image = temp.path().join("image");
        fs::create_dir_all(image.join("bin")).unwrap();
        let launcher = image.join("bin/hello");
        fs::write(&launcher, "#!/bin/sh\n").unwrap();
        make_executable(&launcher).unwrap();
        fs::write(image.join("release"), "JAVA_VERSION=17\n").unwrap();

        let archive_path = temp.path().join("image.zip");
        zip_image(&image, &archive_path).unwrap();

        let mut archive = ZipArchive::new(fs::File::open(&archive_path).unwrap()).unwrap();
        let mode = archive
            .by_name("bin/hello")
            .unwrap()
            .unix_mode()
            .expect("entry should carry unix permissions");
        assert_ne!(mode & 0o111, 0, "launcher lost its execute bits: {mode:o}");
        let release_mode = archive.by_name("release").unwrap().unix_mode().unwrap();
        assert_eq!(release_mode & 0o111, 0);
    }
}
