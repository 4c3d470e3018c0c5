#[cfg(test)]
mod tests {
    use super::super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_description_contract() {
        let config = Config::default();
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.llm.max_tokens, 60);
        assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.llm.base_url, "https://api.openai.com");
        assert_eq!(config.classifier.upstream, "hosted");
        assert_eq!(config.server.bind, "127.0.0.1:3001");
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[("OPENAI_API_KEY", "   ")]));
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::from_toml_str(
            r#"
            [server]
            bind = "0.0.0.0:8080"

            [llm]
            model = "gpt-4o-mini"
            api_key = "sk-from-file"

            [classifier]
            upstream = "local"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.api_key.as_ref().unwrap().expose_secret(), "sk-from-file");

        config.apply_env(env(&[
            ("OPENAI_API_KEY", "sk-from-env"),
            ("SCOUT_CLASSIFIER", "http://10.0.0.5:8000/predict"),
        ]));

        assert_eq!(config.api_key().unwrap().expose_secret(), "sk-from-env");
        assert_eq!(config.classifier.upstream, "http://10.0.0.5:8000/predict");
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        // Unset sections keep their defaults
        assert_eq!(config.llm.max_tokens, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let mut config = Config::from_toml_str("[llm]\ntemperature = 3.5\n").unwrap();
        config.apply_env(env(&[("OPENAI_API_KEY", "sk-test")]));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_bind_rejected() {
        let mut config = Config::default();
        config.apply_env(env(&[("OPENAI_API_KEY", "sk-test"), ("SCOUT_BIND", "localhost")]));
        assert!(matches!(config.bind_addr(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        assert!(matches!(Config::from_toml_str("[llm\nmodel ="), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_api_key_not_leaked_by_debug() {
        let mut config = Config::default();
        config.apply_env(env(&[("OPENAI_API_KEY", "sk-super-secret")]));
        let dump = format!("{config:?}");
        assert!(!dump.contains("sk-super-secret"));
    }

    #[test]
    fn test_load_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let missing = missing.to_str().unwrap();

        let err = Config::load_with(env(&[("SCOUT_CONFIG", missing), ("OPENAI_API_KEY", "sk-test")]))
            .unwrap_err();
        match err {
            ConfigError::NotFound(path) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        // No scout.toml in the crate directory tests run from.
        assert!(!Path::new(DEFAULT_CONFIG_PATH).exists());

        let config = Config::load_with(env(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.server.bind, "127.0.0.1:3001");
        assert_eq!(config.llm.timeout_secs, None);
        assert_eq!(config.server.static_dir, None);
    }

    #[test]
    fn test_load_reads_file_then_applies_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.toml");
        std::fs::write(
            &path,
            "[server]\nstatic_dir = \"web/dist\"\n\n[llm]\nmodel = \"gpt-4o-mini\"\ntimeout_secs = 20\n",
        )
        .unwrap();

        let config = Config::load_with(env(&[
            ("SCOUT_CONFIG", path.to_str().unwrap()),
            ("OPENAI_API_KEY", "sk-test"),
            ("SCOUT_LLM_MODEL", "gpt-4-turbo"),
        ]))
        .unwrap();

        assert_eq!(config.llm.model, "gpt-4-turbo");
        assert_eq!(config.llm.timeout_secs, Some(20));
        assert_eq!(config.server.static_dir, Some(PathBuf::from("web/dist")));
        assert_eq!(config.api_key().unwrap().expose_secret(), "sk-test");
    }

    #[test]
    fn test_load_validates_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.toml");
        std::fs::write(&path, "[llm]\nmax_tokens = 0\n").unwrap();
        let path = path.to_str().unwrap();

        let err = Config::load_with(env(&[("SCOUT_CONFIG", path)])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));

        let err = Config::load_with(env(&[("SCOUT_CONFIG", path), ("OPENAI_API_KEY", "sk-test")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.toml");
        std::fs::write(&path, "[llm\n").unwrap();

        let err = Config::load_with(env(&[("SCOUT_CONFIG", path.to_str().unwrap()), ("OPENAI_API_KEY", "sk-test")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
