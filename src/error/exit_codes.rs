use crate::error::FxError;

pub fn get_exit_code(error: &FxError) -> i32 {
    match error {
        FxError::InvalidConfig(_)
        | FxError::ConfigFile(_)
        | FxError::InvalidCompressLevel(_)
        | FxError::ValidationError(_) => 2,

        FxError::ModuleDescriptorRequired | FxError::LauncherRequired { .. } => 3,

        // Propagate the child's failure, keep zero for ourselves
        FxError::CommandFailed { exit_code, .. } => {
            if *exit_code > 0 {
                *exit_code
            } else {
                1
            }
        }

        FxError::CommandLaunch { .. } => 126,

        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_with_two() {
        assert_eq!(get_exit_code(&FxError::InvalidCompressLevel(3)), 2);
        assert_eq!(get_exit_code(&FxError::InvalidConfig("bad".to_string())), 2);
    }

    #[test]
    fn test_command_failure_propagates_exit_code() {
        let err = FxError::CommandFailed {
            command: "java -version".to_string(),
            exit_code: 42,
        };
        assert_eq!(get_exit_code(&err), 42);

        let err = FxError::CommandFailed {
            command: "java".to_string(),
            exit_code: -1,
        };
        assert_eq!(get_exit_code(&err), 1);
    }
}
