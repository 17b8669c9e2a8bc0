//! Inbound metrics samples.
//!
//! One sample arrives per feed message. The payload matches the snapshot the
//! site server broadcasts once a second.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while decoding a feed payload.
#[derive(Debug, Error)]
pub enum SampleError {
    /// Payload was not valid JSON or did not match the sample shape.
    #[error("malformed metrics payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Request rate was negative or not a finite number.
    #[error("invalid requests_per_sec: {0}")]
    InvalidRate(f64),
}

/// One record of server performance counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSample {
    pub requests_per_sec: f64,
    pub p50_micros: u64,
    pub p95_micros: u64,
    pub p99_micros: u64,
    pub websocket_clients: u64,
    pub uptime_secs: u64,
    pub total_requests: u64,
}

impl MetricsSample {
    /// Decode a sample from a feed payload.
    ///
    /// Every field is required. Integer fields reject negative and fractional
    /// values; unknown extra fields are ignored.
    pub fn parse(payload: &str) -> Result<Self, SampleError> {
        let sample: MetricsSample = serde_json::from_str(payload.trim())?;
        sample.validate()
    }

    fn validate(self) -> Result<Self, SampleError> {
        if !self.requests_per_sec.is_finite() || self.requests_per_sec < 0.0 {
            return Err(SampleError::InvalidRate(self.requests_per_sec));
        }
        Ok(self)
    }

    /// Latency percentiles in bar order.
    pub fn latency_bars(&self) -> [u64; 3] {
        [self.p50_micros, self.p95_micros, self.p99_micros]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "requests_per_sec": 12.5,
        "websocket_clients": 3,
        "uptime_secs": 3661,
        "p50_micros": 1200,
        "p95_micros": 4800,
        "p99_micros": 15000,
        "total_requests": 1234567
    }"#;

    #[test]
    fn parses_server_snapshot() {
        let sample = MetricsSample::parse(PAYLOAD).unwrap();
        assert_eq!(sample.requests_per_sec, 12.5);
        assert_eq!(sample.websocket_clients, 3);
        assert_eq!(sample.latency_bars(), [1200, 4800, 15000]);
        assert_eq!(sample.total_requests, 1_234_567);
    }

    #[test]
    fn ignores_unknown_fields() {
        let payload = PAYLOAD.replace("\"uptime_secs\"", "\"extra\": true, \"uptime_secs\"");
        assert!(MetricsSample::parse(&payload).is_ok());
    }

    #[test]
    fn integer_rate_is_accepted() {
        let payload = PAYLOAD.replace("12.5", "12");
        assert_eq!(MetricsSample::parse(&payload).unwrap().requests_per_sec, 12.0);
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            MetricsSample::parse("not json"),
            Err(SampleError::Json(_))
        ));
    }

    #[test]
    fn rejects_missing_field() {
        let payload = r#"{"requests_per_sec": 1.0, "p50_micros": 1}"#;
        assert!(MetricsSample::parse(payload).is_err());
    }

    #[test]
    fn rejects_negative_counters() {
        let payload = PAYLOAD.replace("\"websocket_clients\": 3", "\"websocket_clients\": -1");
        assert!(MetricsSample::parse(&payload).is_err());
    }

    #[test]
    fn rejects_negative_rate() {
        let payload = PAYLOAD.replace("12.5", "-0.5");
        assert!(matches!(
            MetricsSample::parse(&payload),
            Err(SampleError::InvalidRate(_))
        ));
    }
}
