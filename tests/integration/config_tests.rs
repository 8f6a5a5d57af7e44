//! Configuration integration tests
//!
//! Load a YAML file from disk and wire the resulting router and agent table.

#[cfg(test)]
mod tests {
    use crate::common::FakeProvider;
    use llm_relay::{
        LoggingConfig, PromptPayload, RelayConfig, RelayError, StrategyInput, StrategyKind,
        init_logging,
    };
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_file_config_drives_router_and_agents() {
        let file = write_config(
            r#"
router:
  default_cooldown_ms: 5000
agents:
  reviewer: sequential
  agent1: parallel
"#,
        );

        let config = RelayConfig::from_file(file.path()).await.unwrap();
        let router = Arc::new(config.build_router());
        let agents = config.agent_router(router.clone());

        assert_eq!(agents.strategy_for("reviewer"), StrategyKind::Sequential);
        assert_eq!(agents.strategy_for("agent1"), StrategyKind::Parallel);
        assert_eq!(agents.strategy_for("agent2"), StrategyKind::Parallel);
        assert_eq!(agents.strategy_for("stream"), StrategyKind::StreamFirst);
        assert_eq!(agents.strategy_for("unlisted"), StrategyKind::FallbackOnly);

        router.register_provider("flaky", Arc::new(FakeProvider::ok("x").fail_times(1)));
        router
            .send_prompt_to("flaky", &PromptPayload::new("hi"))
            .await
            .unwrap_err();

        let stats = router.telemetry().get_stats("flaky");
        let last_used = stats.last_used.unwrap();
        assert_eq!(stats.cooldown_end_time, Some(last_used + 5_000));
    }

    #[tokio::test]
    async fn test_configured_agent_runs_its_strategy() {
        let file = write_config("agents:\n  reviewer: sequential\n");
        let config = RelayConfig::from_file(file.path()).await.unwrap();
        let router = Arc::new(config.build_router());
        router.register_provider("only", Arc::new(FakeProvider::ok("reviewed")));

        let output = config
            .agent_router(router)
            .select_agent_strategy("reviewer")
            .run(StrategyInput::new(PromptPayload::new("check this")))
            .await
            .unwrap();

        assert_eq!(output.strategy, StrategyKind::Sequential);
        assert_eq!(output.output, "reviewed");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RelayConfig::from_file(dir.path().join("absent.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Io(_)));
    }

    #[tokio::test]
    async fn test_unknown_strategy_is_yaml_error() {
        let file = write_config("agents:\n  reviewer: round-robin\n");
        let err = RelayConfig::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, RelayError::Yaml(_)));
    }

    #[tokio::test]
    async fn test_invalid_values_are_config_errors() {
        let file = write_config("router:\n  event_capacity: 0\n");
        let err = RelayConfig::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
        assert!(!err.is_exhausted());
    }

    #[test]
    fn test_layered_configs() {
        let base = RelayConfig::from_yaml_str(
            "router:\n  default_cooldown_ms: 20000\nagents:\n  a: sequential\n",
        )
        .unwrap();
        let overlay =
            RelayConfig::from_yaml_str("router:\n  max_parallel: 4\nagents:\n  a: parallel\n")
                .unwrap();

        let merged = base.merge(overlay);
        assert_eq!(merged.router.default_cooldown(), Duration::from_secs(20));
        assert_eq!(merged.router.max_parallel, Some(4));
        assert_eq!(merged.agents["a"], StrategyKind::Parallel);
    }

    #[test]
    fn test_logging_installs_once() {
        let config = LoggingConfig {
            level: "llm_relay=debug".to_string(),
            ..LoggingConfig::default()
        };
        // Another test in this binary may have installed a subscriber first
        let _ = init_logging(&config).unwrap();
        assert!(!init_logging(&config).unwrap());
    }
}
