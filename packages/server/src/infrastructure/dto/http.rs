//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::RoomSummary;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

impl HealthDto {
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
        }
    }
}

/// Room summary for the room list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub room_id: String,
    pub members: usize,
}

impl From<RoomSummary> for RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            room_id: summary.room_id.into_string(),
            members: summary.members,
        }
    }
}
