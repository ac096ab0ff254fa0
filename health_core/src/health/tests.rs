#[cfg(test)]
mod tests {
    use crate::error::{AppError, Result};
    use crate::health::aggregator::Aggregator;
    use crate::health::probe::{FnProbe, Probe, TcpProbe};
    use crate::health::registry::Registry;
    use crate::health::report::{HealthStatus, ProbeResult, Report};
    use crate::health::reporter;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    struct SlowProbe {
        name: String,
        delay: Duration,
        timeout: Option<Duration>,
    }

    #[async_trait]
    impl Probe for SlowProbe {
        fn name(&self) -> &str {
            &self.name
        }

        fn timeout(&self) -> Option<Duration> {
            self.timeout
        }

        async fn check(&self) -> Result<ProbeResult> {
            tokio::time::sleep(self.delay).await;
            Ok(ProbeResult::healthy("finally responded"))
        }
    }

    struct PanickingProbe;

    #[async_trait]
    impl Probe for PanickingProbe {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn check(&self) -> Result<ProbeResult> {
            panic!("probe exploded");
        }
    }

    fn healthy_probe(name: &str) -> FnProbe {
        let description = format!("{} reachable", name);
        FnProbe::new(name, move || Ok(ProbeResult::healthy(description.clone())))
    }

    fn unhealthy_probe(name: &str, error: &str) -> FnProbe {
        let error = error.to_string();
        FnProbe::new(name, move || Ok(ProbeResult::unhealthy(error.clone())))
    }

    #[test]
    fn test_health_status_display() {
        assert_eq!(HealthStatus::Healthy.to_string(), "healthy");
        assert_eq!(HealthStatus::Degraded.to_string(), "degraded");
        assert_eq!(HealthStatus::Unhealthy.to_string(), "unhealthy");
    }

    #[test]
    fn test_health_status_severity_order() {
        assert!(HealthStatus::Healthy < HealthStatus::Degraded);
        assert!(HealthStatus::Degraded < HealthStatus::Unhealthy);
        assert_eq!(
            HealthStatus::Healthy.max(HealthStatus::Unhealthy),
            HealthStatus::Unhealthy
        );
    }

    #[test]
    fn test_probe_result_constructors() {
        let result = ProbeResult::healthy("all good");
        assert_eq!(result.status, HealthStatus::Healthy);
        assert_eq!(result.description.as_deref(), Some("all good"));
        assert!(result.error.is_none());

        let result = ProbeResult::degraded("slow response");
        assert_eq!(result.status, HealthStatus::Degraded);
        assert_eq!(result.description.as_deref(), Some("slow response"));
        assert!(result.error.is_none());

        let result = ProbeResult::unhealthy("connection refused");
        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert!(result.description.is_none());
        assert_eq!(result.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_probe_result_with_duration() {
        let result = ProbeResult::healthy("ok").with_duration(Duration::from_millis(42));
        assert_eq!(result.duration_ms, 42);
    }

    #[test]
    fn test_empty_report_is_healthy() {
        let report = Report::new();
        assert_eq!(report.overall_status, HealthStatus::Healthy);
        assert!(report.entries.is_empty());
        assert!(report.is_healthy());
    }

    #[test]
    fn test_report_overall_status_is_worst_case() {
        let mut report = Report::new();

        report.push("cache", ProbeResult::healthy("cache ok"));
        assert_eq!(report.overall_status, HealthStatus::Healthy);

        report.push("db", ProbeResult::degraded("db slow"));
        assert_eq!(report.overall_status, HealthStatus::Degraded);

        report.push("queue", ProbeResult::unhealthy("queue down"));
        assert_eq!(report.overall_status, HealthStatus::Unhealthy);

        // a later healthy entry must not improve the overall verdict
        report.push("disk", ProbeResult::healthy("disk ok"));
        assert_eq!(report.overall_status, HealthStatus::Unhealthy);
        assert!(!report.is_healthy());
    }

    #[test]
    fn test_report_preserves_insertion_order() {
        let mut report = Report::new();
        report.push("b", ProbeResult::healthy("ok"));
        report.push("a", ProbeResult::healthy("ok"));
        report.push("c", ProbeResult::healthy("ok"));

        let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_report_get() {
        let mut report = Report::new();
        report.push("db", ProbeResult::unhealthy("connection refused"));

        let result = report.get("db").unwrap();
        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert!(report.get("missing").is_none());
    }

    #[test]
    fn test_registry_registration_order() {
        let mut registry = Registry::new();
        registry.register(healthy_probe("db")).unwrap();
        registry.register(healthy_probe("cache")).unwrap();
        registry.register(healthy_probe("queue")).unwrap();

        let names: Vec<&str> = registry.list().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["db", "cache", "queue"]);
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_registry_rejects_duplicate_name() {
        let mut registry = Registry::new();
        registry.register(healthy_probe("db")).unwrap();

        let err = registry.register(unhealthy_probe("db", "other")).unwrap_err();
        assert!(matches!(err, AppError::DuplicateProbe(name) if name == "db"));

        // the failed call must leave the registry untouched
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list()[0].name(), "db");
    }

    #[test]
    fn test_registry_get() {
        let mut registry = Registry::new();
        registry.register(healthy_probe("db")).unwrap();

        assert!(registry.get("db").is_some());
        assert!(registry.get("cache").is_none());
    }

    #[test]
    fn test_tcp_probe_builder() {
        let probe = TcpProbe::new("db", "localhost:5432")
            .with_degraded_threshold(Duration::from_millis(200))
            .with_timeout(Duration::from_secs(2));

        assert_eq!(probe.name(), "db");
        assert_eq!(probe.address(), "localhost:5432");
        assert_eq!(probe.timeout(), Some(Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_tcp_probe_connection_refused() {
        // port 1 is reserved and closed on any sane test machine
        let probe = TcpProbe::new("db", "127.0.0.1:1");
        let result = probe.check().await.unwrap();

        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert!(result.error.unwrap().contains("127.0.0.1:1"));
    }

    #[tokio::test]
    async fn test_aggregator_empty_registry() {
        let aggregator = Aggregator::new(Arc::new(Registry::new()), Duration::from_secs(1));
        let report = aggregator.run().await;

        assert_eq!(report.overall_status, HealthStatus::Healthy);
        assert!(report.entries.is_empty());
    }

    #[tokio::test]
    async fn test_aggregator_all_healthy() {
        let mut registry = Registry::new();
        registry.register(healthy_probe("db")).unwrap();
        registry.register(healthy_probe("cache")).unwrap();

        let aggregator = Aggregator::new(Arc::new(registry), Duration::from_secs(1));
        let report = aggregator.run().await;

        assert_eq!(report.overall_status, HealthStatus::Healthy);
        assert_eq!(report.entries.len(), 2);

        let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["db", "cache"]);
    }

    #[tokio::test]
    async fn test_aggregator_contains_failing_probe() {
        let mut registry = Registry::new();
        registry.register(healthy_probe("db")).unwrap();
        registry
            .register(FnProbe::new("flaky", || {
                Err(AppError::Probe("backend exploded".to_string()))
            }))
            .unwrap();

        let aggregator = Aggregator::new(Arc::new(registry), Duration::from_secs(1));
        let report = aggregator.run().await;

        assert_eq!(report.overall_status, HealthStatus::Unhealthy);
        assert_eq!(report.entries.len(), 2);

        let healthy = report.get("db").unwrap();
        assert_eq!(healthy.status, HealthStatus::Healthy);

        let failing = report.get("flaky").unwrap();
        assert_eq!(failing.status, HealthStatus::Unhealthy);
        assert!(failing.error.as_deref().unwrap().contains("backend exploded"));
    }

    #[tokio::test]
    async fn test_aggregator_contains_panicking_probe() {
        let mut registry = Registry::new();
        registry.register(PanickingProbe).unwrap();
        registry.register(healthy_probe("db")).unwrap();

        let aggregator = Aggregator::new(Arc::new(registry), Duration::from_secs(1));
        let report = aggregator.run().await;

        assert_eq!(report.overall_status, HealthStatus::Unhealthy);
        assert_eq!(report.entries.len(), 2);

        let panicked = report.get("panicking").unwrap();
        assert_eq!(panicked.status, HealthStatus::Unhealthy);
        assert!(panicked.error.as_deref().unwrap().contains("probe task failed"));

        // the panic must not take the other probe down with it
        assert_eq!(report.get("db").unwrap().status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_aggregator_enforces_probe_timeout() {
        let mut registry = Registry::new();
        registry
            .register(SlowProbe {
                name: "stuck".to_string(),
                delay: Duration::from_secs(5),
                timeout: Some(Duration::from_millis(100)),
            })
            .unwrap();

        let aggregator = Aggregator::new(Arc::new(registry), Duration::from_secs(10));
        let started = Instant::now();
        let report = aggregator.run().await;
        let elapsed = started.elapsed();

        // bounded by the probe's own 100ms deadline, not the 5s sleep
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_secs(1));

        let stuck = report.get("stuck").unwrap();
        assert_eq!(stuck.status, HealthStatus::Unhealthy);
        assert!(stuck.error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_aggregator_runs_probes_concurrently() {
        let mut registry = Registry::new();
        for name in ["first", "second", "third"] {
            registry
                .register(SlowProbe {
                    name: name.to_string(),
                    delay: Duration::from_millis(200),
                    timeout: None,
                })
                .unwrap();
        }

        let aggregator = Aggregator::new(Arc::new(registry), Duration::from_secs(1));
        let started = Instant::now();
        let report = aggregator.run().await;

        // three 200ms probes in sequence would need 600ms
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(report.overall_status, HealthStatus::Healthy);
        assert_eq!(report.entries.len(), 3);
    }

    #[tokio::test]
    async fn test_aggregator_run_probe() {
        let mut registry = Registry::new();
        registry.register(unhealthy_probe("cache", "connection refused")).unwrap();

        let aggregator = Aggregator::new(Arc::new(registry), Duration::from_secs(1));

        let result = aggregator.run_probe("cache").await.unwrap();
        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert_eq!(result.error.as_deref(), Some("connection refused"));

        assert!(aggregator.run_probe("missing").await.is_none());
    }

    #[test]
    fn test_machine_readable_contract() {
        let mut report = Report::new();
        report.push("db", ProbeResult::healthy("db reachable"));
        report.push("cache", ProbeResult::unhealthy("connection refused"));

        let body = reporter::to_machine_readable(&report).unwrap();
        assert_eq!(
            body,
            r#"{"status":"Unhealthy","entries":[{"key":"db","status":"Healthy","error":null},{"key":"cache","status":"Unhealthy","error":"connection refused"}]}"#
        );
    }

    #[test]
    fn test_machine_readable_empty_report() {
        let report = Report::new();
        let body = reporter::to_machine_readable(&report).unwrap();
        assert_eq!(body, r#"{"status":"Healthy","entries":[]}"#);
    }

    #[test]
    fn test_ui_format_shape() {
        let mut report = Report::new();
        report.push(
            "db",
            ProbeResult::healthy("db reachable").with_duration(Duration::from_millis(12)),
        );
        report.push("cache", ProbeResult::unhealthy("connection refused"));
        report.total_duration_ms = 15;

        let body = reporter::to_ui_format(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(value["schema_version"], reporter::UI_SCHEMA_VERSION);
        assert_eq!(value["status"], "Unhealthy");
        assert_eq!(value["total_duration_ms"], 15);
        assert!(value["generated_at"].is_string());

        let probes = value["probes"].as_array().unwrap();
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[0]["name"], "db");
        assert_eq!(probes[0]["description"], "db reachable");
        assert_eq!(probes[0]["duration_ms"], 12);
        assert_eq!(probes[1]["error"], "connection refused");
    }

    #[test]
    fn test_probe_result_serialization() {
        let result = ProbeResult::unhealthy("connection refused").with_duration(Duration::from_millis(7));

        let serialized = serde_json::to_string(&result).unwrap();
        let deserialized: ProbeResult = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized, result);
    }
}
