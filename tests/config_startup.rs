//! Integration tests for settings loaded from a config file driving the engine

mod common;

use std::time::Duration;

use medqueue_app::config::{init_config_dir, load_settings, load_settings_from};
use medqueue_app::{Binding, Engine, Message};
use medqueue_core::{AuthRole, Screen};
use tempfile::tempdir;

fn write_config(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("medqueue.toml");
    std::fs::write(&path, body).expect("write config");
    (dir, path)
}

fn try_passcode(engine: &mut Engine, code: &str) {
    common::send_all(
        engine,
        [
            Message::Input {
                binding: Binding::Passcode,
                value: code.to_string(),
            },
            Message::SubmitPasscode,
        ],
    );
}

#[tokio::test]
async fn test_access_code_from_config_file() {
    let (_dir, path) = write_config("[auth]\naccess_code = \"9999\"\n");
    let mut engine = Engine::new(load_settings_from(&path));

    engine.process_message(Message::ChooseRole(AuthRole::Staff));
    assert_eq!(engine.state().screen, Screen::LoginView);

    try_passcode(&mut engine, "1234");
    assert_eq!(engine.state().screen, Screen::LoginView);
    assert!(engine.state().notice.is_some());

    try_passcode(&mut engine, "9999");
    assert_eq!(engine.state().screen, Screen::StaffView);
}

#[tokio::test]
async fn test_default_config_seeds_demo_queue() {
    let dir = tempdir().expect("tempdir");
    init_config_dir(dir.path()).expect("init");
    let mut engine = Engine::new(load_settings(dir.path()));
    assert_eq!(engine.sync().store().name(), "memory");

    common::start(&mut engine).await;
    assert_eq!(engine.state().queue.len(), 3);
}

#[tokio::test]
async fn test_seed_can_be_turned_off() {
    let (_dir, path) = write_config("[remote]\nseed_demo = false\n");
    let mut engine = Engine::new(load_settings_from(&path));

    engine.mark_ready();
    let processed = tokio::time::timeout(Duration::from_secs(2), engine.process_next()).await;
    assert!(matches!(processed, Ok(true)));
    assert!(engine.state().queue.is_empty());
}

#[tokio::test]
async fn test_postgrest_without_url_falls_back_to_memory() {
    let (_dir, path) = write_config("[remote]\nbackend = \"postgrest\"\n");
    let engine = Engine::new(load_settings_from(&path));
    assert_eq!(engine.sync().store().name(), "memory");
}
