use renpy_config::Loader;
use std::fs;
use tempfile::tempdir;

#[test]
fn user_file_replaces_builtins() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("renpy.toml");
    fs::write(
        &path,
        "[analysis]\nbuiltins = [\"narrator\"]\n\n[diagnostics]\nmax_reported = 0\n",
    )
    .expect("write config");

    let config = Loader::new().with_file(&path).build().expect("config to build");
    assert_eq!(config.analysis.builtins, vec!["narrator".to_string()]);
    // untouched keys keep their defaults
    assert!(config.analysis.report_unresolved);
    assert_eq!(config.diagnostics.max_reported, 0);
}

#[test]
fn missing_optional_file_is_ignored() {
    let dir = tempdir().expect("temp dir");
    let config = Loader::new()
        .with_optional_file(dir.path().join("absent.toml"))
        .build()
        .expect("config to build");
    assert_eq!(config.diagnostics.max_reported, 100);
}

#[test]
fn missing_required_file_is_an_error() {
    let dir = tempdir().expect("temp dir");
    let result = Loader::new()
        .with_file(dir.path().join("absent.toml"))
        .build();
    assert!(result.is_err());
}

#[test]
fn override_wins_over_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("renpy.toml");
    fs::write(&path, "[inspect]\nshow_line_numbers = true\n").expect("write config");

    let config = Loader::new()
        .with_file(&path)
        .set_override("inspect.show_line_numbers", false)
        .expect("override to apply")
        .build()
        .expect("config to build");
    assert!(!config.inspect.show_line_numbers);
}
