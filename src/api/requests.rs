//! API request bodies and their validation
//!
//! Numbers arrive the way a form field would send them, so both JSON numbers
//! and numeric strings are accepted.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::ValidationError,
    nudge::{self, NudgeConfig},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeKind {
    Count,
    Percent,
}

/// Nudge selection as sent by the client
#[derive(Debug, Clone, Deserialize)]
pub struct NudgeRequest {
    #[serde(rename = "type")]
    pub kind: NudgeKind,
    pub value: Value,
}

impl NudgeRequest {
    pub fn to_config(&self, duration_seconds: u64) -> Result<NudgeConfig, ValidationError> {
        let value = whole_number(&self.value).ok_or(ValidationError::NotANumber { field: "nudge value" })?;
        match self.kind {
            NudgeKind::Count => NudgeConfig::count(value, duration_seconds),
            NudgeKind::Percent => NudgeConfig::percent(value),
        }
    }
}

/// Body of `POST /timer/start`
#[derive(Debug, Clone, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub minutes: Value,
    pub nudge: Option<NudgeRequest>,
}

impl StartRequest {
    /// Countdown length in seconds plus the nudge layout
    pub fn validate(&self) -> Result<(u64, NudgeConfig), ValidationError> {
        let minutes = whole_number(&self.minutes).ok_or(ValidationError::MissingDuration)?;
        let total_seconds = nudge::duration_seconds(minutes)?;
        let config = match &self.nudge {
            Some(request) => request.to_config(total_seconds)?,
            None => NudgeConfig::default(),
        };
        Ok((total_seconds, config))
    }
}

/// Body of `POST /nudges/preview`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub minutes: Value,
    pub nudge: Option<NudgeRequest>,
}

impl PreviewRequest {
    /// Like [`StartRequest::validate`], except an unusable duration falls
    /// back to `fallback_minutes` so the preview keeps rendering while the
    /// user is still typing
    pub fn resolve(&self, fallback_minutes: u64) -> Result<(u64, NudgeConfig), ValidationError> {
        let total_seconds = whole_number(&self.minutes)
            .and_then(|minutes| nudge::duration_seconds(minutes).ok())
            .unwrap_or(fallback_minutes * 60);
        let config = match &self.nudge {
            Some(request) => request.to_config(total_seconds)?,
            None => NudgeConfig::default(),
        };
        Ok((total_seconds, config))
    }
}

/// Read an integer from a JSON number or a numeric string
fn whole_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
