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

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;

/// Module names with this prefix belong to the JavaFX runtime and are kept on
/// the module path even for non-modular projects.
pub const JAVAFX_MODULE_PREFIX: &str = "javafx.";

/// Where a dependency's module name came from.
///
/// Filename-derived names are unstable across jar renames, consumers of this
/// enum emit a diagnostic when they see one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleNameSource {
    /// Declared in a compiled module descriptor bundled with the artifact
    ModuleDescriptor,
    /// `Automatic-Module-Name` entry in the jar manifest
    Manifest,
    /// Derived from the jar's filename (automatic module)
    Filename,
}

/// A module name together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReference {
    pub name: String,
    pub source: ModuleNameSource,
}

impl fmt::Display for ModuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The main project's module descriptor: name, exported packages and
/// required module names. Absent for non-modular projects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct JavaModuleDescriptor {
    pub name: String,
    #[serde(default)]
    pub exports: BTreeSet<String>,
    #[serde(default)]
    pub requires: BTreeSet<String>,
}

impl JavaModuleDescriptor {
    /// A project that exports nothing is an application, one with exports is
    /// a library. Affects the severity of the automatic-module diagnostic.
    pub fn is_application(&self) -> bool {
        self.exports.is_empty()
    }
}

/// Forces all dependencies onto one path, or lets the classifier decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuntimePathMode {
    /// Defer to the module descriptor and the JavaFX module-name prefix
    #[default]
    Auto,
    /// Everything on the classpath, module information discarded
    Classpath,
    /// Everything on the module path, requires a module descriptor
    Modulepath,
}

/// Derive an automatic module name from a jar file name, the way the module
/// system does: drop the extension, cut the trailing version (first `-` that
/// is followed by a digit), turn non-alphanumeric runs into single dots and
/// trim dots at both ends.
pub fn derive_module_name(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".jar").unwrap_or(file_name);

    let bytes = stem.as_bytes();
    let mut cut = stem.len();
    for i in 0..bytes.len().saturating_sub(1) {
        if bytes[i] == b'-' && bytes[i + 1].is_ascii_digit() {
            cut = i;
            break;
        }
    }
    let stem = &stem[..cut];

    let mut name = String::with_capacity(stem.len());
    let mut last_was_dot = true; // suppress a leading dot
    for c in stem.chars() {
        if c.is_alphanumeric() {
            name.push(c);
            last_was_dot = false;
        } else if !last_was_dot {
            name.push('.');
            last_was_dot = true;
        }
    }
    while name.ends_with('.') {
        name.pop();
    }
    name
}
