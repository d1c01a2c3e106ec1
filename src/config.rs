use crate::error::{FxError, Result};
use crate::modules::{JavaModuleDescriptor, RuntimePathMode};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "fxbuild.toml";

/// Project configuration, loaded from `fxbuild.toml`.
///
/// The dependency list models what the build system's resolver hands the
/// plugin: an ordered collection of resolved jar/directory paths. The
/// project's compiled-output directory is implicitly first.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FxConfig {
    pub project: ProjectConfig,

    /// Present only for modular projects (a `module-info.java` exists).
    #[serde(default)]
    pub module: Option<JavaModuleDescriptor>,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub compile: CompileConfig,

    #[serde(default)]
    pub jlink: JlinkConfig,

    #[serde(default, rename = "package")]
    pub packaging: PackageConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub main_class: String,

    /// Directory with the compiled classes, the first path element.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Where jlink images and zips go.
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Resolved dependency files in resolver order.
    #[serde(default)]
    pub dependencies: Vec<PathBuf>,

    /// Defaults to the project base directory.
    #[serde(default)]
    pub working_directory: Option<PathBuf>,

    /// JDK installation override; its bin directory is preferred when
    /// locating tools.
    #[serde(default)]
    pub jdk_home: Option<PathBuf>,

    #[serde(default)]
    pub skip: bool,

    #[serde(default)]
    pub runtime_path_option: Option<RuntimePathMode>,

    #[serde(default)]
    pub include_path_exceptions_in_classpath: bool,

    /// Whether the main class extends javafx.application.Application; a
    /// fact supplied by the build metadata, needed to reject classpath-only
    /// launches that cannot work.
    #[serde(default)]
    pub main_class_extends_application: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RunConfig {
    pub executable: String,
    /// VM options passed to the executable, each entry tokenized.
    pub options: Vec<String>,
    /// Arguments separated by space for the executed program, e.g. "-j 20".
    pub commandline_args: Option<String>,
    /// Redirect the child's output into this file.
    pub output_file: Option<PathBuf>,
    /// Execute the child asynchronously and continue the build.
    pub r#async: bool,
    /// Destroy a still-running asynchronous child when the build exits.
    pub async_destroy_on_shutdown: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            executable: "java".to_string(),
            options: Vec::new(),
            commandline_args: None,
            output_file: None,
            r#async: false,
            async_destroy_on_shutdown: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CompileConfig {
    pub executable: String,
    pub release: Option<String>,
    pub source: String,
    pub target: String,
    pub compiler_args: Vec<String>,
    /// Source files containing any of these fragments are not compiled.
    pub excludes: Vec<String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            executable: "javac".to_string(),
            release: Some("11".to_string()),
            source: "11".to_string(),
            target: "11".to_string(),
            compiler_args: Vec::new(),
            excludes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct JlinkConfig {
    pub executable: String,
    pub strip_debug: bool,
    pub strip_java_debug_attributes: bool,
    pub compress: u8,
    pub no_header_files: bool,
    pub no_man_pages: bool,
    pub bind_services: bool,
    pub ignore_signing_information: bool,
    pub verbose: bool,
    /// `--launcher <name>=<module>/<mainclass>` script name.
    pub launcher: Option<String>,
    pub image_name: String,
    /// When set, the runtime image is zipped into `<build_dir>/<name>.zip`.
    pub zip_name: Option<String>,
    /// Optional jmods path for local builds, prepended to the module path.
    pub jmods_path: Option<String>,
    pub output_file: Option<PathBuf>,
}

impl Default for JlinkConfig {
    fn default() -> Self {
        Self {
            executable: "jlink".to_string(),
            strip_debug: false,
            strip_java_debug_attributes: false,
            compress: 0,
            no_header_files: false,
            no_man_pages: false,
            bind_services: false,
            ignore_signing_information: false,
            verbose: false,
            launcher: None,
            image_name: "image".to_string(),
            zip_name: None,
            jmods_path: None,
            output_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PackageConfig {
    pub executable: String,
    /// The directory where the package goes, relative to the base directory.
    pub directory: String,
    /// Reference copied dependencies by absolute path in the script instead
    /// of `modules/<basename>`.
    pub absolute: bool,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            executable: "java".to_string(),
            directory: "package".to_string(),
            absolute: false,
        }
    }
}

impl FxConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            FxError::ConfigFile(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config: FxConfig = toml::from_str(&contents)
            .map_err(|e| FxError::ConfigFile(format!("Failed to parse {}: {e}", path.display())))?;

        if config.project.main_class.is_empty() {
            return Err(FxError::InvalidConfig(
                "The parameter 'main_class' is missing or invalid".to_string(),
            ));
        }

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Purely from the runtime-path option, before any descriptor detection.
    pub fn runtime_path_mode(&self) -> RuntimePathMode {
        self.project.runtime_path_option.unwrap_or_default()
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("target/classes")
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("src/main/java")
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("target")
}
