//! Tests for the configuration module.

use super::*;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.data_dir, "./data");
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.board.width, 8);
    assert_eq!(config.board.height, 8);
    assert_eq!(config.board.win_length, 5);
    assert_eq!(config.board.start_player, 1);
    assert_eq!(config.actor.mode, "selfplay");
    assert_eq!(config.mcts.num_playouts, 400);
}

#[test]
fn test_mcts_defaults() {
    let config = CentralConfig::default();
    assert!((config.mcts.c_puct - 5.0).abs() < f64::EPSILON);
    assert!((config.mcts.temperature - 1.0).abs() < f64::EPSILON);
    assert!((config.mcts.eval_temperature - 0.001).abs() < f64::EPSILON);
    assert_eq!(config.mcts.rollout_limit, 1000);
    assert!((config.mcts.dirichlet_alpha - 0.3).abs() < f64::EPSILON);
    assert!((config.mcts.dirichlet_weight - 0.25).abs() < f64::EPSILON);
}

#[test]
fn test_actor_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.actor.episodes, 10);
    assert_eq!(config.actor.seed, 42);
    assert_eq!(config.actor.log_interval, 1);
    assert_eq!(config.actor.opponent, "rollout");
    assert_eq!(config.actor.opponent_playouts, 1000);
}

#[test]
fn test_gomoku_env_overrides() {
    std::env::set_var("GOMOKU_BOARD_WIN_LENGTH", "4");
    std::env::set_var("GOMOKU_ACTOR_MODE", "match");
    std::env::set_var("GOMOKU_MCTS_DIRICHLET_WEIGHT", "0.5");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.board.win_length, 4);
    assert_eq!(config.actor.mode, "match");
    assert!((config.mcts.dirichlet_weight - 0.5).abs() < f64::EPSILON);

    std::env::remove_var("GOMOKU_BOARD_WIN_LENGTH");
    std::env::remove_var("GOMOKU_ACTOR_MODE");
    std::env::remove_var("GOMOKU_MCTS_DIRICHLET_WEIGHT");
}

#[test]
fn test_unparseable_env_override_is_ignored() {
    std::env::set_var("GOMOKU_ACTOR_OPPONENT_PLAYOUTS", "lots");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.actor.opponent_playouts, 1000);

    std::env::remove_var("GOMOKU_ACTOR_OPPONENT_PLAYOUTS");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
data_dir = "/custom/data"

[board]
width = 15
height = 15
start_player = 2

[actor]
episodes = 100
mode = "match"
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.data_dir, "/custom/data");
    assert_eq!(config.board.width, 15);
    assert_eq!(config.board.height, 15);
    assert_eq!(config.board.win_length, 5); // Default
    assert_eq!(config.board.start_player, 2);
    assert_eq!(config.actor.episodes, 100);
    assert_eq!(config.actor.mode, "match");
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[common]
log_level = "debug"
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.log_level, "debug");
    assert_eq!(config.common.data_dir, "./data"); // Default
    assert_eq!(config.actor.seed, 42); // Default
    assert_eq!(config.mcts.rollout_limit, 1000); // Default
}

#[test]
fn test_mcts_config_from_toml() {
    let toml_content = r#"
[mcts]
num_playouts = 2000
c_puct = 2.0
temperature = 0.5
rollout_limit = 50
dirichlet_alpha = 0.5
dirichlet_weight = 0.3
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.mcts.num_playouts, 2000);
    assert!((config.mcts.c_puct - 2.0).abs() < f64::EPSILON);
    assert!((config.mcts.temperature - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.mcts.rollout_limit, 50);
    assert!((config.mcts.dirichlet_alpha - 0.5).abs() < f64::EPSILON);
    assert!((config.mcts.dirichlet_weight - 0.3).abs() < f64::EPSILON);
}

#[test]
fn test_load_from_path() {
    let path = std::env::temp_dir().join(format!("gomoku-config-{}.toml", std::process::id()));
    std::fs::write(&path, "[board]\nwidth = 11\n").unwrap();

    let config = load_from_path(&path);
    assert_eq!(config.board.width, 11);
    assert_eq!(config.board.height, 8);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_load_from_bad_path_falls_back() {
    let config = load_from_path(std::path::Path::new("/nonexistent/gomoku/config.toml"));
    assert_eq!(config.board.width, 8);
    assert_eq!(config.common.log_level, "info");
}

#[test]
fn test_config_clone() {
    let config = CentralConfig::default();
    let cloned = config.clone();
    assert_eq!(config.common.data_dir, cloned.common.data_dir);
    assert_eq!(config.actor.mode, cloned.actor.mode);
}
