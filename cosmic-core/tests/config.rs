use cosmic_core::CosmicConfig;
use cosmic_shared::config;

#[test]
fn test_empty_config_uses_defaults() {
    let cfg = CosmicConfig::from_table(&config::parse(""));
    assert_eq!(cfg.ui.screen_transition_ms, 50);
    assert_eq!(cfg.ui.modal_z_base, 1000);
    assert_eq!(cfg.ui.modal_z_step, 10);
    assert_eq!(cfg.ui.event_log_size, 5);
    assert_eq!(cfg.visuals.star_count, 200);
    assert_eq!(cfg.colors.primary, "#00ffff");
    assert_eq!(cfg.music.crossfade_secs, 3.0);
    assert_eq!(cfg.audio.master_volume, 0.7);
}

#[test]
fn test_sections_override_partially() {
    let table = config::parse(
        r##"
        [ui]
        loading_delay_ms = 500

        [colors.ship]
        critical = "#ff0000"

        [music]
        chord_change_secs = 4.0
        "##,
    );
    let cfg = CosmicConfig::from_table(&table);
    assert_eq!(cfg.ui.loading_delay_ms, 500);
    assert_eq!(cfg.ui.loading_delay_secs(), 0.5);
    assert_eq!(cfg.ui.toast_ms, 3000);
    assert_eq!(cfg.colors.ship.critical, "#ff0000");
    assert_eq!(cfg.colors.ship.healthy, "#33ff33");
    assert_eq!(cfg.music.chord_change_secs, 4.0);
    assert_eq!(cfg.music.layer_fade_secs, 2.0);
}

#[test]
fn test_bad_section_only_affects_itself() {
    let table = config::parse(
        r#"
        [canvas]
        width = "wide"

        [visuals]
        star_count = 50
        "#,
    );
    let cfg = CosmicConfig::from_table(&table);
    assert_eq!(cfg.canvas.width, 1280);
    assert_eq!(cfg.visuals.star_count, 50);
}

#[test]
fn test_syntax_error_falls_back_to_empty() {
    let cfg = CosmicConfig::from_table(&config::parse("[ui\nscreen_transition_ms = "));
    assert_eq!(cfg.ui.screen_transition_ms, 50);
}

#[test]
fn test_defaults_round_trip_through_toml() {
    let text = toml::to_string(&CosmicConfig::default()).unwrap();
    let cfg = CosmicConfig::from_table(&config::parse(&text));
    assert_eq!(cfg.game.api_url, "http://localhost:5000/api");
    assert_eq!(cfg.sprites.planets.len(), 3);
    assert_eq!(cfg.animations.explosion.particle_count, 30);
}
