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

use crate::error::FxError;
use std::fmt;

pub struct ErrorContext<'a> {
    pub error: &'a FxError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(error: &'a FxError) -> Self {
        let (suggestion, details) = match error {
            FxError::ModuleDescriptorRequired => {
                let suggestion = Some(
                    "Add a module-info.java to the project, or remove the MODULEPATH \
                     runtimePathOption so the paths are chosen automatically."
                        .to_string(),
                );
                (suggestion, None)
            }
            FxError::LauncherRequired { .. } => {
                let suggestion = Some(
                    "Create a launcher class with a main method that calls \
                     Application.launch(), and set it as mainClass."
                        .to_string(),
                );
                (suggestion, None)
            }
            FxError::InvalidCompressLevel(level) => {
                let suggestion = Some("Valid compress values are 0, 1 and 2.".to_string());
                let details = Some(format!("Configured compress level: {level}"));
                (suggestion, details)
            }
            FxError::OutputDirectoryMissing(_) => {
                let suggestion =
                    Some("Run 'fxbuild compile' before this goal, or check that the configured \
                          output directory is correct."
                        .to_string());
                (suggestion, None)
            }
            FxError::CommandFailed { command, .. } => {
                let details = Some(format!("Executed command line: {command}"));
                (None, details)
            }
            FxError::ConfigFile(msg) => {
                let suggestion = Some(
                    "Check the fxbuild.toml syntax; see the README for the available keys."
                        .to_string(),
                );
                let details = Some(msg.clone());
                (suggestion, details)
            }
            _ => (None, None),
        };

        ErrorContext {
            error,
            suggestion,
            details,
        }
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}
