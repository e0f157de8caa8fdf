use super::*;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.aura.name, "Aura");
    assert_eq!(cfg.llm.model, "gpt-4o");
    assert_eq!(cfg.llm.history_limit, 20);
    assert_eq!(cfg.scheduler.delivery_timeout_secs, 30);
    assert_eq!(cfg.scheduler.reconnect_max_secs, 60);
    assert_eq!(cfg.api.port, 8000);
    assert_eq!(cfg.whatsapp.api_version, "v22.0");
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
        [aura]
        name = "TestBot"

        [whatsapp]
        phone_number_id = "123456"
        verify_token = "secret"

        [scheduler]
        delivery_timeout_secs = 5
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(cfg.aura.name, "TestBot");
    assert_eq!(cfg.whatsapp.phone_number_id, "123456");
    assert_eq!(cfg.whatsapp.verify_token, "secret");
    assert_eq!(cfg.scheduler.delivery_timeout_secs, 5);
    // Sections not present fall back to defaults.
    assert_eq!(cfg.store.db_path, "~/.aura/aura.db");
    assert_eq!(cfg.llm.base_url, "https://api.openai.com/v1");
}

#[test]
fn test_partial_section_uses_field_defaults() {
    let toml_str = r#"
        [llm]
        model = "gpt-4o-mini"
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(cfg.llm.model, "gpt-4o-mini");
    assert_eq!(cfg.llm.history_limit, 20);
}

#[test]
fn test_shellexpand_home() {
    // Read HOME instead of setting it; env mutation would race with
    // parallel tests.
    if let Ok(home) = std::env::var("HOME") {
        assert_eq!(shellexpand("~/data/aura.db"), format!("{home}/data/aura.db"));
    }
    assert_eq!(shellexpand("/tmp/aura.db"), "/tmp/aura.db");
}
