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

//! Module-path/classpath classification of resolved dependencies.

pub mod analyzer;
mod classify;
mod model;

pub use analyzer::{JarAnalyzer, ModuleAnalyzer, PathAnalysis, has_module_descriptor};
pub use classify::{ClassificationResult, classify};
pub use model::{
    JAVAFX_MODULE_PREFIX, JavaModuleDescriptor, ModuleNameSource, ModuleReference, RuntimePathMode,
    derive_module_name,
};
