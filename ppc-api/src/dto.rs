//! Data Transfer Objects for API requests and responses
//!
//! Request bodies keep every field optional so that absent values reach the
//! domain validators and come back with a proper error code instead of a
//! deserialization failure.

use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use ppc_core::aggregation::SurveyResults;
use ppc_core::types::{
    ActivityItem, CivicIssue, CouncilMember, DashboardStats, Event, GovernanceDecision,
    GovernanceMetrics, Location, Pagination, PublicCitizen, Survey, SurveyResponse,
};

// ============ Envelope ============

/// Success envelope `{success:true, data, message?}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data: Some(data),
        })
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        })
    }

    pub fn created(data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Self::ok(data))
    }
}

impl ApiResponse<()> {
    /// Message only, no data
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data: None,
        })
    }
}

// ============ Auth DTOs ============

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthData {
    pub citizen: PublicCitizen,
    pub token: String,
}

// ============ Citizen DTOs ============

#[derive(Debug, Serialize)]
pub struct CitizenData {
    pub citizen: PublicCitizen,
}

#[derive(Debug, Serialize)]
pub struct CitizenList {
    pub citizens: Vec<PublicCitizen>,
    pub pagination: Pagination,
}

#[derive(Debug, Default, Deserialize)]
pub struct InterestsRequest {
    /// Must be a JSON array; anything else is `INVALID_FORMAT`
    #[serde(default)]
    pub interests: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationRequest {
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RoleRequest {
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CitizenQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

// ============ Issue DTOs ============

#[derive(Debug, Serialize)]
pub struct IssueData {
    pub issue: CivicIssue,
}

#[derive(Debug, Serialize)]
pub struct IssueList {
    pub issues: Vec<CivicIssue>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct CitizenIssues {
    pub issues: Vec<CivicIssue>,
    pub count: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub comment: Option<String>,
}

// ============ Event DTOs ============

#[derive(Debug, Serialize)]
pub struct EventData {
    pub event: Event,
}

#[derive(Debug, Serialize)]
pub struct EventList {
    pub events: Vec<Event>,
    pub count: usize,
}

// ============ Survey DTOs ============

#[derive(Debug, Serialize)]
pub struct SurveyData {
    pub survey: Survey,
}

#[derive(Debug, Serialize)]
pub struct SurveyList {
    pub surveys: Vec<Survey>,
    pub count: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnswersRequest {
    #[serde(default)]
    pub answers: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ResponseData {
    pub response: SurveyResponse,
}

pub type ResultsData = SurveyResults;

// ============ Governance DTOs ============

#[derive(Debug, Serialize)]
pub struct MemberData {
    pub member: CouncilMember,
}

#[derive(Debug, Serialize)]
pub struct MemberList {
    pub members: Vec<CouncilMember>,
}

#[derive(Debug, Serialize)]
pub struct DecisionData {
    pub decision: GovernanceDecision,
}

#[derive(Debug, Serialize)]
pub struct DecisionList {
    pub decisions: Vec<GovernanceDecision>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DecisionQuery {
    pub status: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MetricsData {
    pub metrics: GovernanceMetrics,
}

// ============ Admin DTOs ============

pub type DashboardData = DashboardStats;
pub type ActivityData = Vec<ActivityItem>;

// ============ Health ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
    pub timestamp: DateTime<Utc>,
}

/// Lenient numeric query parameter; garbage falls back to the default
pub fn parse_number<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.map(str::trim).and_then(|s| s.parse().ok())
}
