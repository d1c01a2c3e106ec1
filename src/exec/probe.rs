//! Version probing of the target JDK tools.

use log::{debug, error};
use std::path::Path;
use std::process::Command;

/// Check whether the target `java` executable is a pre-module-system JVM.
///
/// `java -version` reports on stderr; a version string starting with `1.8`
/// means Java 8.
pub fn is_java8_target(java: &str, working_dir: &Path) -> bool {
    match version_output(java, "-version", working_dir) {
        Some(output) => output.contains("version \"1.8"),
        None => false,
    }
}

/// The major version reported by `jlink --version`, when it can be probed.
pub fn jlink_major_version(jlink: &str, working_dir: &Path) -> Option<u32> {
    let output = version_output(jlink, "--version", working_dir)?;
    let digits: String = output
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn version_output(executable: &str, flag: &str, working_dir: &Path) -> Option<String> {
    let output = Command::new(executable)
        .arg(flag)
        .current_dir(working_dir)
        .output();
    match output {
        Ok(output) if output.status.success() => {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            debug!("{executable} {flag}: {}", text.trim());
            Some(text)
        }
        Ok(output) => {
            error!(
                "Unable to get {executable} version, exit code {}",
                output.status.code().unwrap_or(1)
            );
            None
        }
        Err(e) => {
            debug!("Error probing {executable} version: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn fake_tool(dir: &Path, name: &str, script: &str) -> String {
        use crate::platform::file_ops::make_executable;
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        make_executable(&path).unwrap();
        path.display().to_string()
    }

    #[cfg(unix)]
    #[test]
    fn test_java8_detected_from_stderr() {
        let temp = TempDir::new().unwrap();
        let java8 = fake_tool(
            temp.path(),
            "java8",
            "echo 'java version \"1.8.0_291\"' 1>&2",
        );
        assert!(is_java8_target(&java8, temp.path()));

        let java17 = fake_tool(temp.path(), "java17", "echo 'java version \"17.0.2\"' 1>&2");
        assert!(!is_java8_target(&java17, temp.path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_jlink_major_version_parsed() {
        let temp = TempDir::new().unwrap();
        let jlink = fake_tool(temp.path(), "jlink", "echo '17.0.2'");
        assert_eq!(jlink_major_version(&jlink, temp.path()), Some(17));

        let old = fake_tool(temp.path(), "jlink11", "echo '11.0.1'");
        assert_eq!(jlink_major_version(&old, temp.path()), Some(11));
    }

    #[test]
    fn test_probe_of_missing_tool_is_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(jlink_major_version("definitely-not-jlink", temp.path()), None);
        assert!(!is_java8_target("definitely-not-java", temp.path()));
    }
}
