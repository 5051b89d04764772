//! Integration tests for the configuration layers

use std::sync::Mutex;
use stylepreview::config::ConfigLoader;
use tempfile::TempDir;

/// Serializes tests that touch process environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Point XDG_CONFIG_HOME at an empty directory so a developer's global config cannot leak in.
fn isolated_xdg() -> (TempDir, Option<String>) {
    let xdg = TempDir::new().unwrap();
    let previous = std::env::var("XDG_CONFIG_HOME").ok();
    std::env::set_var("XDG_CONFIG_HOME", xdg.path());
    (xdg, previous)
}

fn restore_xdg(previous: Option<String>) {
    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }
}

#[test]
fn test_workspace_file_overrides_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let (_xdg, previous) = isolated_xdg();
    let workspace = TempDir::new().unwrap();
    std::fs::write(
        workspace.path().join("stylepreview.toml"),
        r#"
[horde]
api_key = "0000000000"
client_agent = "gallery-bot:1.0:ops@example.com"

[output]
root = "site"
cdn_url_prefix = "https://cdn.example.com/previews"

[generation]
stagger_ms = 500
skip_styles = ["stonehenge sunrise", "broken style"]
"#,
    )
    .unwrap();

    let config = ConfigLoader::load(workspace.path()).unwrap();
    restore_xdg(previous);

    assert_eq!(config.api_key(), Some("0000000000"));
    assert_eq!(config.horde.client_agent, "gallery-bot:1.0:ops@example.com");
    assert_eq!(config.horde.base_url, "https://aihorde.net/api");
    assert_eq!(
        config.output.resolve_root(workspace.path()),
        workspace.path().join("site")
    );
    assert_eq!(config.generation.stagger_ms, 500);
    assert_eq!(config.generation.poll_interval_ms, 15_000);
    assert_eq!(config.generation.skip_styles.len(), 2);
    assert!(config.validate().is_ok());
}

#[test]
fn test_environment_overrides_workspace_file() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let (_xdg, previous) = isolated_xdg();
    let workspace = TempDir::new().unwrap();
    std::fs::write(
        workspace.path().join("stylepreview.toml"),
        "[generation]\npoll_interval_ms = 30000\n",
    )
    .unwrap();

    std::env::set_var("STYLEPREVIEW__GENERATION__POLL_INTERVAL_MS", "1000");
    std::env::set_var("STYLEPREVIEW__HORDE__API_KEY", "from-env");
    let config = ConfigLoader::load(workspace.path());
    std::env::remove_var("STYLEPREVIEW__GENERATION__POLL_INTERVAL_MS");
    std::env::remove_var("STYLEPREVIEW__HORDE__API_KEY");
    restore_xdg(previous);

    let config = config.unwrap();
    assert_eq!(config.generation.poll_interval_ms, 1000);
    assert_eq!(config.api_key(), Some("from-env"));
}

#[test]
fn test_environment_keeps_numeric_looking_strings() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let (_xdg, previous) = isolated_xdg();
    let workspace = TempDir::new().unwrap();

    std::env::set_var("STYLEPREVIEW__HORDE__API_KEY", "0000000000");
    std::env::set_var("STYLEPREVIEW__HORDE__CLIENT_AGENT", "007");
    std::env::set_var("STYLEPREVIEW__GENERATION__STAGGER_MS", "250");
    std::env::set_var("STYLEPREVIEW__GENERATION__SKIP_STYLES", "stonehenge sunrise,Neon");
    let config = ConfigLoader::load(workspace.path());
    std::env::remove_var("STYLEPREVIEW__HORDE__API_KEY");
    std::env::remove_var("STYLEPREVIEW__HORDE__CLIENT_AGENT");
    std::env::remove_var("STYLEPREVIEW__GENERATION__STAGGER_MS");
    std::env::remove_var("STYLEPREVIEW__GENERATION__SKIP_STYLES");
    restore_xdg(previous);

    let config = config.unwrap();
    assert_eq!(config.api_key(), Some("0000000000"));
    assert_eq!(config.horde.client_agent, "007");
    assert_eq!(config.generation.stagger_ms, 250);
    assert_eq!(
        config.generation.skip_styles,
        vec!["stonehenge sunrise".to_string(), "Neon".to_string()]
    );
}

#[test]
fn test_global_file_sits_below_workspace_file() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let (xdg, previous) = isolated_xdg();
    let global_dir = xdg.path().join("stylepreview");
    std::fs::create_dir_all(&global_dir).unwrap();
    std::fs::write(
        global_dir.join("config.toml"),
        "[generation]\nstagger_ms = 100\nmax_poll_attempts = 10\n",
    )
    .unwrap();
    let workspace = TempDir::new().unwrap();
    std::fs::write(
        workspace.path().join("stylepreview.toml"),
        "[generation]\nstagger_ms = 200\n",
    )
    .unwrap();

    let config = ConfigLoader::load(workspace.path());
    restore_xdg(previous);

    let config = config.unwrap();
    assert_eq!(config.generation.stagger_ms, 200);
    assert_eq!(config.generation.max_poll_attempts, 10);
}

#[test]
fn test_explicit_file_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.toml");
    assert!(ConfigLoader::load_from_file(&missing).is_err());
}
