mod context;
mod exit_codes;
mod format;

pub use context::ErrorContext;
pub use exit_codes::get_exit_code;
pub use format::{format_error_chain, format_error_with_color};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration file error: {0}")]
    ConfigFile(String),

    #[error("A module descriptor is required when runtimePathOption is MODULEPATH")]
    ModuleDescriptorRequired,

    #[error(
        "Main class '{main_class}' extends the JavaFX Application class and cannot be launched \
         from the classpath"
    )]
    LauncherRequired { main_class: String },

    #[error("Compress level {0} is not in the valid value range from 0..2")]
    InvalidCompressLevel(u8),

    #[error("Output directory doesn't exist, compile first: {0}")]
    OutputDirectoryMissing(String),

    #[error("Could not make working directory: '{0}'")]
    WorkingDirectory(String),

    #[error("Result of {command} execution is: '{exit_code}'")]
    CommandFailed { command: String, exit_code: i32 },

    #[error("Command execution failed: {command}")]
    CommandLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't create directory {0}")]
    DirectoryCreation(String),

    #[error("Can't copy {source_path} to {destination}")]
    Copy {
        source_path: String,
        destination: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image can't be removed {0}")]
    ImageRemoval(String),

    #[error("Package create error: {0}")]
    PackageCreate(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, FxError>;
