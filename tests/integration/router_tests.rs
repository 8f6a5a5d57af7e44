//! Router integration tests
//!
//! Dispatch through the public router API and the state it leaves behind.

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::common::providers::START_MS;
    use crate::common::{FakeProvider, relay_with};
    use llm_relay::{
        PromptPayload, ProviderError, RouterError, RouterEvent, StreamToken, TelemetryStats,
        TokenSink,
    };
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_success_then_failure_updates_both_stores() {
        let (router, _, _) = relay_with(vec![("openai", FakeProvider::ok("answer"))]);
        let payload = PromptPayload::new("hello").for_provider("openai");
        router.send_prompt(&payload).await.unwrap();

        router.unregister_provider("openai");
        router.register_provider(
            "openai",
            Arc::new(FakeProvider::failing(ProviderError::api(500, "internal"))),
        );
        let err = router.send_prompt(&payload).await.unwrap_err();
        assert!(err.is_recoverable());

        let stats = router.telemetry().get_stats("openai");
        assert_eq!(stats.success_count, 1);
        assert_eq!(stats.failure_count, 1);
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.last_error.as_deref(), Some("API error (500): internal"));
        assert_approx_eq!(router.telemetry().get_success_rate("openai"), 0.5);

        let score = router.scores().get_stats("openai");
        assert_approx_eq!(score.success_rate, 0.5);
        assert_eq!(score.retry_count, 1);
    }

    #[tokio::test]
    async fn test_unknown_provider_has_no_side_effects() {
        let (router, _, _) = relay_with(vec![("openai", FakeProvider::ok("x"))]);
        let mut events = router.subscribe();

        let err = router
            .send_prompt(&PromptPayload::new("hi").for_provider("nobody"))
            .await
            .unwrap_err();

        assert_eq!(err, RouterError::ProviderNotRegistered("nobody".to_string()));
        assert_eq!(
            router.telemetry().get_stats("nobody"),
            TelemetryStats::empty("nobody")
        );
        assert!(router.telemetry().get_all_stats().is_empty());
        assert!(router.scores().all_stats().is_empty());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failure_cooldown_expires_with_clock() {
        let (router, clock, _) = relay_with(vec![(
            "p",
            FakeProvider::failing(ProviderError::Timeout("30s".to_string())),
        )]);

        router
            .send_prompt_to("p", &PromptPayload::new("hi"))
            .await
            .unwrap_err();

        let stats = router.telemetry().get_stats("p");
        assert_eq!(stats.cooldown_end_time, Some(START_MS + 60_000));
        assert!(router.telemetry().is_cooling_down("p"));

        clock.advance(Duration::from_secs(61));
        assert!(!router.telemetry().is_cooling_down("p"));
    }

    #[tokio::test]
    async fn test_streaming_round_trip() {
        let (router, _, _) = relay_with(vec![(
            "stream",
            FakeProvider::ok("").streaming(&["one ", "two"]),
        )]);
        let tokens = Arc::new(Mutex::new(Vec::new()));
        let sink_tokens = tokens.clone();
        let sink = TokenSink::new(move |t| sink_tokens.lock().push(t));

        let payload = PromptPayload::with_request_id("req-s", "count").for_provider("stream");
        router.stream_prompt(&payload, sink).await.unwrap();

        let tokens = tokens.lock().clone();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens.last(), Some(&StreamToken::final_token("req-s")));
        assert_eq!(tokens.iter().filter(|t| t.is_final).count(), 1);
        assert_eq!(router.telemetry().get_stats("stream").success_count, 1);
    }

    #[tokio::test]
    async fn test_cancel_reaches_every_provider() {
        let (router, _, providers) = relay_with(vec![
            ("a", FakeProvider::ok("x")),
            ("b", FakeProvider::ok("x")),
        ]);

        router.cancel("req-42");

        for provider in providers {
            assert_eq!(provider.cancelled(), vec!["req-42"]);
        }
    }

    #[tokio::test]
    async fn test_event_stream_reports_outcomes() {
        let (router, _, _) = relay_with(vec![
            ("good", FakeProvider::ok("x")),
            ("bad", FakeProvider::failing(ProviderError::Network("reset".to_string()))),
        ]);
        let mut events = router.subscribe();

        let payload = PromptPayload::with_request_id("req-e", "hi");
        router.send_prompt_to("bad", &payload).await.unwrap_err();
        router.send_prompt_to("good", &payload).await.unwrap();

        let first = events.recv().await.unwrap();
        assert_eq!(
            first,
            RouterEvent::ProviderFailure {
                provider: "bad".to_string(),
                request_id: "req-e".to_string(),
                error: "Network error: reset".to_string(),
            }
        );
        let second = events.recv().await.unwrap();
        assert!(matches!(second, RouterEvent::ProviderSuccess { ref provider, .. } if provider == "good"));
    }

    #[tokio::test]
    async fn test_reset_stats_restores_zero_state() {
        let (router, _, _) = relay_with(vec![("p", FakeProvider::ok("x").fail_times(1))]);
        let payload = PromptPayload::new("hi");
        router.send_prompt_to("p", &payload).await.unwrap_err();
        router.send_prompt_to("p", &payload).await.unwrap();

        router.telemetry().reset_stats("p");
        router.scores().reset_stats("p");

        assert_eq!(router.telemetry().get_stats("p"), TelemetryStats::empty("p"));
        assert_eq!(
            router.scores().get_stats("p"),
            router.scores().get_stats("never-seen")
        );
    }
}
