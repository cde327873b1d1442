//! Shell preference persistence and the config paths behind it.

use berth::config_paths;

// ========================================================================
// Config paths
// ========================================================================

#[test]
fn test_config_file_lives_under_the_app_dir() {
    let path = config_paths::config_file().unwrap();
    let path = path.to_string_lossy();
    assert!(path.contains("berth"));
    assert!(path.ends_with("config.yaml"));
}

#[test]
fn test_themes_and_logs_sit_under_the_app_dir() {
    assert!(config_paths::themes_dir().unwrap().ends_with("berth/themes"));
    assert!(config_paths::logs_dir().unwrap().ends_with("berth/logs"));
}

// ========================================================================
// Preferences on disk
// ========================================================================

#[test]
fn test_set_theme_persists_for_the_next_load() {
    #[cfg(not(target_os = "windows"))]
    {
        use berth::config::ShellConfig;

        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());

        // Fresh directory, nothing saved yet: defaults
        assert_eq!(ShellConfig::load().theme, "dark");

        let mut prefs = ShellConfig::load();
        prefs.set_theme("light").unwrap();

        let file = dir.path().join("berth").join("config.yaml");
        assert!(file.exists());
        assert_eq!(ShellConfig::load().theme, "light");

        // A file that no longer parses falls back to defaults
        std::fs::write(&file, "theme: [unterminated").unwrap();
        assert_eq!(ShellConfig::load().theme, "dark");
    }
}
