//! Request and response bodies

use serde::{Deserialize, Serialize};

/// Body of `POST /tasks` and `PUT /tasks/{id}`
///
/// `description` is optional at the wire level so a missing field is
/// reported as invalid input rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TaskBody {
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}
