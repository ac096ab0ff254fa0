//! Probe implementations for external dependencies

use crate::error::Result;
use crate::health::report::ProbeResult;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;

/// A check against one external dependency. Implementations are registered
/// once at startup and invoked repeatedly by the aggregator; `timeout`
/// overrides the configured default deadline when set.
#[async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> &str;

    fn timeout(&self) -> Option<Duration> {
        None
    }

    async fn check(&self) -> Result<ProbeResult>;
}

/// Probes a dependency by opening a TCP connection to its address.
/// Connections slower than the degraded threshold report `Degraded`.
pub struct TcpProbe {
    name: String,
    address: String,
    degraded_after: Duration,
    timeout: Option<Duration>,
}

impl TcpProbe {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            degraded_after: Duration::from_millis(1000),
            timeout: None,
        }
    }

    pub fn with_degraded_threshold(mut self, threshold: Duration) -> Self {
        self.degraded_after = threshold;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl Probe for TcpProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn check(&self) -> Result<ProbeResult> {
        let start = Instant::now();

        match TcpStream::connect(self.address.as_str()).await {
            Ok(_) => {
                let elapsed = start.elapsed();
                if elapsed >= self.degraded_after {
                    Ok(ProbeResult::degraded(format!(
                        "{} responding slowly ({}ms)",
                        self.address,
                        elapsed.as_millis()
                    )))
                } else {
                    Ok(ProbeResult::healthy(format!("connected to {}", self.address)))
                }
            }
            Err(e) => Ok(ProbeResult::unhealthy(format!(
                "connection to {} failed: {}",
                self.address, e
            ))),
        }
    }
}

/// Closure-backed probe for in-process dependencies and test stubs.
pub struct FnProbe {
    name: String,
    timeout: Option<Duration>,
    check_fn: Box<dyn Fn() -> Result<ProbeResult> + Send + Sync>,
}

impl FnProbe {
    pub fn new<F>(name: impl Into<String>, check_fn: F) -> Self
    where
        F: Fn() -> Result<ProbeResult> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            timeout: None,
            check_fn: Box::new(check_fn),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl Probe for FnProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn check(&self) -> Result<ProbeResult> {
        (self.check_fn)()
    }
}
