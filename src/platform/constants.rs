//! Platform-specific constants and utility functions.

use std::collections::HashMap;

/// Platform-specific path separator
pub fn path_separator() -> char {
    #[cfg(windows)]
    return ';';
    #[cfg(not(windows))]
    return ':';
}

/// Check if the current platform is in the Windows family
pub fn is_windows() -> bool {
    cfg!(windows)
}

/// Candidate executable extensions for the given environment snapshot.
///
/// On Windows the `PATHEXT` variable wins when set; otherwise the usual
/// suspects are tried in order. On other platforms the bare name is checked
/// first and the candidates only apply as a fallthrough.
pub fn executable_extensions(env: &HashMap<String, String>) -> Vec<String> {
    match env.get("PATHEXT") {
        Some(pathext) if !pathext.is_empty() => pathext
            .to_lowercase()
            .split(path_separator())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => vec![
            ".exe".to_string(),
            ".com".to_string(),
            ".cmd".to_string(),
            ".bat".to_string(),
        ],
    }
}

/// Check for an extension Windows can launch without a shell (`.exe`, `.com`)
pub fn has_native_extension(exec: &str) -> bool {
    let lower = exec.to_lowercase();
    lower.ends_with(".exe") || lower.ends_with(".com")
}

/// Check whether the name carries any of the candidate executable extensions
pub fn has_batch_extension(exec: &str, env: &HashMap<String, String>) -> bool {
    let lower = exec.to_lowercase();
    executable_extensions(env)
        .iter()
        .any(|ext| lower.ends_with(ext))
}

/// The command shell used to launch batch scripts, `cmd` when ComSpec is unset
pub fn comspec(env: &HashMap<String, String>) -> String {
    env.get("ComSpec")
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| "cmd".to_string())
}

/// Strip one pair of surrounding single or double quotes, if present
pub fn strip_quotes(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_separator() {
        let sep = path_separator();
        #[cfg(windows)]
        assert_eq!(sep, ';');
        #[cfg(not(windows))]
        assert_eq!(sep, ':');
    }

    #[test]
    fn test_default_extensions() {
        let env = HashMap::new();
        let exts = executable_extensions(&env);
        assert_eq!(exts, vec![".exe", ".com", ".cmd", ".bat"]);
    }

    #[test]
    fn test_pathext_overrides_defaults() {
        let mut env = HashMap::new();
        env.insert(
            "PATHEXT".to_string(),
            [".COM", ".EXE", ".BAT"].join(&path_separator().to_string()),
        );
        let exts = executable_extensions(&env);
        assert_eq!(exts, vec![".com", ".exe", ".bat"]);
    }

    #[test]
    fn test_native_and_batch_extensions() {
        let env = HashMap::new();
        assert!(has_native_extension("java.exe"));
        assert!(has_native_extension("TOOL.COM"));
        assert!(!has_native_extension("java.bat"));
        assert!(has_batch_extension("java.bat", &env));
        assert!(has_batch_extension("java.CMD", &env));
        assert!(!has_batch_extension("java", &env));
    }

    #[test]
    fn test_comspec_fallback() {
        let mut env = HashMap::new();
        assert_eq!(comspec(&env), "cmd");
        env.insert(
            "ComSpec".to_string(),
            "C:\\Windows\\system32\\cmd.exe".to_string(),
        );
        assert_eq!(comspec(&env), "C:\\Windows\\system32\\cmd.exe");
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"/opt/java\""), "/opt/java");
        assert_eq!(strip_quotes("'/opt/java'"), "/opt/java");
        assert_eq!(strip_quotes("/opt/java"), "/opt/java");
        assert_eq!(strip_quotes("\"unbalanced"), "\"unbalanced");
    }
}
