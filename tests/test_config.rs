use std::path::{Path, PathBuf};

use amor_fati::config::Config;
use amor_fati::error::GameError;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("amor_fati_{}_{}.toml", std::process::id(), name))
}

// ── Loading ───────────────────────────────────────────────────────────────────

#[test]
fn missing_file_gives_defaults() {
    let path = scratch_path("missing");
    let _ = std::fs::remove_file(&path);
    assert_eq!(Config::load(&path).unwrap(), Config::default());
}

#[test]
fn partial_file_fills_in_the_rest() {
    let text = "bpm = 90.0\n\n[player]\nhp = 5\n";
    let config = Config::from_toml(text, Path::new("partial.toml")).unwrap();

    assert_eq!(config.bpm, 90.0);
    assert_eq!(config.player.hp, 5);
    assert_eq!(config.player.max_casts, 3);
    assert_eq!(config.frame_ms, 33);
    assert_eq!(config.canvas, Config::default().canvas);
    assert_eq!(config.sprites, None);
}

#[test]
fn malformed_file_is_a_config_error() {
    let path = scratch_path("malformed");
    std::fs::write(&path, "bpm = \"fast\"\n[player\n").unwrap();
    let result = Config::load(&path);
    let _ = std::fs::remove_file(&path);

    match result {
        Err(GameError::Config { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected a config error, got {:?}", other),
    }
}

#[test]
fn file_on_disk_is_read() {
    let path = scratch_path("on_disk");
    std::fs::write(&path, "frame_ms = 16\n[stage]\nwidth = 320.0\n").unwrap();
    let config = Config::load(&path);
    let _ = std::fs::remove_file(&path);

    let config = config.unwrap();
    assert_eq!(config.frame_ms, 16);
    assert_eq!(config.stage.width, 320.0);
    assert_eq!(config.stage.ceiling, 130.0);
}

#[test]
fn sample_config_matches_the_defaults() {
    let text = include_str!("../amor_fati.toml");
    let config = Config::from_toml(text, Path::new("amor_fati.toml")).unwrap();
    assert_eq!(config, Config::default());
}
