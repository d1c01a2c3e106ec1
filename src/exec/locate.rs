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

//! Locating the concrete tool executable to invoke.

use crate::platform::{executable_extensions, is_windows, path_separator, strip_quotes};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolves a logical tool name (`java`, `javac`, `jlink`) or explicit path
/// to the executable that will be invoked.
pub struct ExecutableResolver<'a> {
    env: &'a HashMap<String, String>,
    working_dir: &'a Path,
    /// JDK installation override; its `bin` directory is preferred over the
    /// environment-based search.
    toolchain: Option<&'a Path>,
}

impl<'a> ExecutableResolver<'a> {
    pub fn new(
        env: &'a HashMap<String, String>,
        working_dir: &'a Path,
        toolchain: Option<&'a Path>,
    ) -> Self {
        Self {
            env,
            working_dir,
            toolchain,
        }
    }

    /// Resolve the executable. Never fails: when nothing is found the raw
    /// name is returned and the OS reports the failure at launch time.
    pub fn resolve(&self, executable: &str) -> String {
        let as_path = Path::new(executable);
        if as_path.is_file() {
            debug!("Toolchains are ignored, 'executable' parameter is set to {executable}");
            return absolute(as_path);
        }

        let extensions = executable_extensions(self.env);

        if let Some(jdk_home) = self.toolchain {
            let bin = jdk_home.join("bin");
            if let Some(found) = find_executable(executable, &[bin], &extensions) {
                debug!("Resolved {executable} from toolchain: {found}");
                return found;
            }
        }

        if let Some(java_home) = self.env.get("JAVA_HOME") {
            let java_home = strip_quotes(java_home);
            if !java_home.is_empty() {
                let bin = Path::new(java_home).join("bin");
                if let Some(found) = find_executable(executable, &[bin], &extensions) {
                    debug!("Resolved {executable} from JAVA_HOME: {found}");
                    return found;
                }
            }
        }

        if is_windows() {
            let mut paths = vec![self.working_dir.to_path_buf()];
            if let Some(path) = self.env.get("PATH") {
                paths.extend(
                    path.split(path_separator())
                        .filter(|p| !p.is_empty())
                        .map(PathBuf::from),
                );
            }
            if let Some(found) = find_executable(executable, &paths, &extensions) {
                debug!("Resolved {executable} from PATH: {found}");
                return found;
            }
        }

        // Unresolved: leave it to the OS launcher.
        executable.to_string()
    }
}

/// Search each directory for `<executable>` (bare name first on non-Windows)
/// and `<executable><ext>` for every candidate extension, in order.
fn find_executable(executable: &str, paths: &[PathBuf], extensions: &[String]) -> Option<String> {
    for path in paths {
        let candidate = path.join(executable);
        if !is_windows() && candidate.is_file() {
            return Some(absolute(&candidate));
        }
        for extension in extensions {
            let candidate = path.join(format!("{executable}{extension}"));
            if candidate.is_file() {
                return Some(absolute(&candidate));
            }
        }
    }
    None
}

fn absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
