use fxbuild::commands::PackageCommand;
use fxbuild::config::FxConfig;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn project(temp: &TempDir) -> FxConfig {
    let classes = temp.path().join("classes");
    fs::create_dir_all(&classes).unwrap();
    fs::write(classes.join("App.class"), b"\xca\xfe\xba\xbe").unwrap();

    let jar = temp.path().join("javafx-base-17.0.2.jar");
    let file = fs::File::create(&jar).unwrap();
    let mut writer = ZipWriter::new(file);
    writer
        .start_file("module-info.class", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"\xca\xfe\xba\xbe").unwrap();
    writer.finish().unwrap();

    let mut config = FxConfig::default();
    config.project.main_class = "com.example.App".to_string();
    config.project.output_dir = classes;
    config.project.dependencies = vec![jar];
    config.project.working_directory = Some(temp.path().to_path_buf());
    config.packaging.directory = temp.path().join("package").display().to_string();
    config
}

#[test]
fn package_copies_dependencies_and_writes_script() {
    let temp = TempDir::new().unwrap();
    let config = project(&temp);

    PackageCommand::new(&config).execute().unwrap();

    let package = PathBuf::from(&config.packaging.directory);
    assert!(package.join("modules/classes/App.class").is_file());
    assert!(package.join("modules/javafx-base-17.0.2.jar").is_file());

    let script = fs::read_to_string(package.join("script.sh")).unwrap();
    assert!(script.starts_with("#!/bin/bash\njava "));
    assert!(script.contains("--module-path"));
    assert!(script.contains("modules/javafx-base-17.0.2.jar"));
    assert!(script.contains("--add-modules javafx.base"));
    assert!(script.trim_end().ends_with("com.example.App"));
}

#[cfg(unix)]
#[test]
fn package_script_is_executable() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let config = project(&temp);
    PackageCommand::new(&config).execute().unwrap();

    let script = PathBuf::from(&config.packaging.directory).join("script.sh");
    let mode = fs::metadata(&script).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0o111);
}

#[test]
fn package_without_module_path_renders_single_spaces() {
    let temp = TempDir::new().unwrap();
    let mut config = project(&temp);

    // A plain jar only, so nothing lands on the module path.
    let jar = temp.path().join("commons-io-2.11.0.jar");
    let file = fs::File::create(&jar).unwrap();
    let mut writer = ZipWriter::new(file);
    writer
        .start_file("META-INF/MANIFEST.MF", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"Manifest-Version: 1.0\n").unwrap();
    writer.finish().unwrap();
    config.project.dependencies = vec![jar];

    PackageCommand::new(&config).execute().unwrap();

    let package = PathBuf::from(&config.packaging.directory);
    let script = fs::read_to_string(package.join("script.sh")).unwrap();
    assert!(script.contains("java -classpath modules/"));
    assert!(!script.contains("--module-path"));
    assert!(!script.contains("  "), "double space in script: {script}");
}

#[test]
fn package_skip_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let mut config = project(&temp);
    config.project.skip = true;

    PackageCommand::new(&config).execute().unwrap();
    assert!(!PathBuf::from(&config.packaging.directory).exists());
}
