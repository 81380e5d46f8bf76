//! HTTP client for the heat pump's local web API.

use crate::catalog::Register;
use crate::config::DeviceConfig;
use crate::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

pub const WEBAPI_PATH: &str = "/cgi-bin/webapi.cgi";

/// Anything that can answer a register query.
///
/// `Ok(None)` means the device answered but had no value for the register; `Err` means the
/// request itself failed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegisterSource: Send + Sync {
    async fn query(&self, register: Register) -> Result<Option<String>, AppError>;
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    #[serde(rename = "SMT_ID")]
    smt_id: &'a str,
    query_list: [Register; 1],
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    values: Option<Map<String, Value>>,
}

#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    url: String,
    smt_id: String,
}

impl DeviceClient {
    pub fn new(cfg: &DeviceConfig) -> Result<Self, AppError> {
        let host = cfg.host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(AppError::Config("device host cannot be empty".into()));
        }
        let base = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: format!("{base}{WEBAPI_PATH}"),
            smt_id: cfg.smt_id.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RegisterSource for DeviceClient {
    async fn query(&self, register: Register) -> Result<Option<String>, AppError> {
        debug!(register, url = %self.url, "querying heat pump");

        let body = QueryRequest {
            smt_id: &self.smt_id,
            query_list: [register],
        };
        let resp = self.http.post(&self.url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Status(status.as_u16()));
        }

        let bytes = resp.bytes().await?;
        debug!(register, body = %String::from_utf8_lossy(&bytes), "heat pump response");
        let parsed: QueryResponse = serde_json::from_slice(&bytes)?;
        extract_value(register, parsed)
    }
}

fn extract_value(register: Register, resp: QueryResponse) -> Result<Option<String>, AppError> {
    let Some(values) = resp.values else {
        return Ok(None);
    };
    match values.get(&register.to_string()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(AppError::Malformed {
            register,
            value: other.to_string(),
        }),
    }
}
