use crate::http::{Response, Status};
use std::time::Duration;

/// A completed find → build → send → decode → interpret cycle
#[derive(Debug, Clone)]
pub struct Exchange {
    pub name: String,
    pub method: String,
    /// Resolved URL actually sent
    pub url: String,
    pub response: Response,
    /// Decoded response body
    pub json: serde_json::Value,
    /// Non-fatal build problems, e.g. unsupported auth
    pub warnings: Vec<String>,
}

/// Outcome of one request in a run
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Position in the run, starting at 1
    pub request_number: usize,

    pub name: String,

    pub method: String,

    /// URL as resolved, or the template when building failed
    pub url: String,

    pub status: Option<Status>,

    pub duration: Duration,

    pub success: bool,

    pub error: Option<String>,

    pub warnings: Vec<String>,

    pub json: Option<serde_json::Value>,
}

impl RunResult {
    /// A request that got a decodable response, whatever its status
    pub fn success(request_number: usize, exchange: Exchange) -> Self {
        Self {
            request_number,
            name: exchange.name,
            method: exchange.method,
            url: exchange.url,
            status: Some(exchange.response.status),
            duration: exchange.response.duration,
            success: true,
            error: None,
            warnings: exchange.warnings,
            json: Some(exchange.json),
        }
    }

    /// A request that failed before producing an [`Exchange`]
    pub fn error(
        request_number: usize,
        name: String,
        method: String,
        url: String,
        error: String,
        duration: Duration,
    ) -> Self {
        Self {
            request_number,
            name,
            method,
            url,
            status: None,
            duration,
            success: false,
            error: Some(error),
            warnings: Vec::new(),
            json: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Requests that got a response outside 2xx
    pub non_success_status: usize,
    pub total_duration: Duration,
}

impl RunSummary {
    /// Tally a finished run
    pub fn from_results(results: &[RunResult]) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        let non_success_status = results
            .iter()
            .filter(|r| r.status.is_some_and(|s| !s.is_success()))
            .count();

        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            non_success_status,
            total_duration: results.iter().map(|r| r.duration).sum(),
        }
    }
}
