//! Publish history records.

use serde::{Deserialize, Serialize};

/// Outcome of a single publish attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Success,
    Failed,
}

impl PublishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Success => "success",
            PublishStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "success" => Some(PublishStatus::Success),
            "failed" => Some(PublishStatus::Failed),
            _ => None,
        }
    }
}

/// Size of the data that was (or would have been) published.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataStats {
    pub products: i64,
    pub categories: i64,
    pub total_size: i64,
}

/// One entry in the publish history. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublishRecord {
    pub id: String,
    pub timestamp: String,
    pub status: PublishStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_stats: Option<DataStats>,
    /// Write phase duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_time: Option<i64>,
    /// Read-back phase duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Fields supplied by the caller when recording an attempt.
#[derive(Debug, Clone)]
pub struct NewPublishRecord {
    pub status: PublishStatus,
    pub message: String,
    pub data_stats: Option<DataStats>,
    pub upload_time: Option<i64>,
    pub verify_time: Option<i64>,
    pub error_message: Option<String>,
}

impl NewPublishRecord {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: PublishStatus::Success,
            message: message.into(),
            data_stats: None,
            upload_time: None,
            verify_time: None,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: PublishStatus::Failed,
            message: message.into(),
            data_stats: None,
            upload_time: None,
            verify_time: None,
            error_message: Some(error.into()),
        }
    }

    pub fn with_stats(mut self, stats: DataStats) -> Self {
        self.data_stats = Some(stats);
        self
    }

    pub fn with_timings(mut self, upload_time: Option<i64>, verify_time: Option<i64>) -> Self {
        self.upload_time = upload_time;
        self.verify_time = verify_time;
        self
    }
}

/// Aggregate figures derived from the retained history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    pub total_attempts: i64,
    pub successful_publishes: i64,
    pub failed_publishes: i64,
    /// Percentage, one decimal place.
    pub success_rate: f64,
    /// Timestamp of the newest successful publish.
    pub last_publish_time: Option<String>,
}
