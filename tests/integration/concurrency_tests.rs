//! Concurrency integration tests
//!
//! Many requests sharing one router must not lose per-provider updates.

#[cfg(test)]
mod tests {
    use crate::common::{FakeProvider, relay_with};
    use futures::future::join_all;
    use llm_relay::{PromptPayload, ProviderScoreManager, TelemetryTracker};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_dispatch_counts_every_call() {
        let (router, _, providers) = relay_with(vec![
            ("a", FakeProvider::ok("a").with_delay(Duration::from_millis(1))),
            ("b", FakeProvider::ok("b").with_delay(Duration::from_millis(1))),
        ]);

        let calls = (0..200).map(|i| {
            let router = router.clone();
            let id = if i % 2 == 0 { "a" } else { "b" };
            tokio::spawn(async move {
                router
                    .send_prompt_to(id, &PromptPayload::new(format!("prompt {i}")))
                    .await
            })
        });

        for result in join_all(calls).await {
            result.unwrap().unwrap();
        }

        for id in ["a", "b"] {
            assert_eq!(router.telemetry().get_stats(id).success_count, 100);
            assert_eq!(router.scores().raw_counters(id).unwrap().total, 100);
        }
        assert!(providers.iter().all(|p| p.calls() == 100));
        assert!(providers.iter().any(|p| p.max_in_flight() > 1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_stores_under_mixed_outcomes() {
        let telemetry = Arc::new(TelemetryTracker::default());
        let scores = Arc::new(ProviderScoreManager::new());

        let tasks = (0..8).map(|worker| {
            let telemetry = telemetry.clone();
            let scores = scores.clone();
            tokio::spawn(async move {
                for i in 0..250 {
                    let success = (worker + i) % 4 != 0;
                    let latency = Duration::from_millis(10);
                    if success {
                        telemetry.record_success("shared", latency);
                    } else {
                        telemetry.record_failure("shared", "scripted", None);
                    }
                    scores.update_score("shared", success, latency);
                }
            })
        });
        for task in join_all(tasks).await {
            task.unwrap();
        }

        let stats = telemetry.get_stats("shared");
        assert_eq!(stats.total_requests, 2000);
        assert_eq!(stats.success_count + stats.failure_count, 2000);
        assert_eq!(stats.failure_count, 500);

        let raw = scores.raw_counters("shared").unwrap();
        assert_eq!(raw.total, 2000);
        assert_eq!(raw.successes, 1500);
        assert_eq!(raw.total_time_ms, 20_000.0);
    }
}
