//! Handlers for lead intake (public) and lead triage (admin).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rocketlab_core::error::CoreError;
use rocketlab_core::lead::{validate_new_lead, ContactMethod, Lead, LeadStatus, NewLead};
use rocketlab_core::triage::{filter_leads, LeadStats, StatusFilter};
use rocketlab_core::types::LeadId;
use rocketlab_db::repositories::LeadRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /leads`.
///
/// `contact_method` arrives as text so an unknown value yields a 400 with
/// the accepted values rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SubmitLeadRequest {
    pub name: String,
    pub contact: String,
    pub contact_method: String,
    #[serde(default)]
    pub budget: Option<String>,
    pub project: String,
}

/// Query parameters for `GET /admin/leads`.
#[derive(Debug, Deserialize)]
pub struct LeadListParams {
    /// Case-insensitive substring of name, contact or project.
    pub search: Option<String>,
    /// A lead status, or `all`.
    pub status: Option<String>,
}

/// Request body for `PATCH /admin/leads/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateLeadStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/leads
///
/// Record a contact-form submission. New leads always start as `new`.
pub async fn submit_lead(
    State(state): State<AppState>,
    Json(input): Json<SubmitLeadRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Lead>>)> {
    let new_lead = NewLead {
        name: input.name,
        contact: input.contact,
        contact_method: ContactMethod::parse(&input.contact_method)?,
        budget: input.budget,
        project: input.project,
    };
    validate_new_lead(&new_lead)?;

    let lead = LeadRepo::create(&state.pool, &new_lead).await?;
    tracing::info!(lead_id = %lead.id, contact_method = %lead.contact_method, "Lead submitted");

    Ok((StatusCode::CREATED, Json(DataResponse { data: lead })))
}

/// GET /api/v1/admin/leads
///
/// All leads newest first, narrowed by the optional `search` and `status`.
pub async fn list_leads(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<LeadListParams>,
) -> AppResult<Json<DataResponse<Vec<Lead>>>> {
    let status_filter = match params.status.as_deref() {
        Some(raw) => raw.parse::<StatusFilter>()?,
        None => StatusFilter::All,
    };
    let search = params.search.unwrap_or_default();

    let leads = LeadRepo::list_newest_first(&state.pool).await?;
    let visible = filter_leads(&leads, search.trim(), status_filter)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(DataResponse { data: visible }))
}

/// GET /api/v1/admin/leads/stats
///
/// Counters over every lead regardless of any filter.
pub async fn lead_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<LeadStats>>> {
    let leads = LeadRepo::list_newest_first(&state.pool).await?;
    Ok(Json(DataResponse {
        data: LeadStats::from_leads(&leads),
    }))
}

/// PATCH /api/v1/admin/leads/{id}/status
///
/// Move a lead to any status. Returns the updated lead.
pub async fn update_lead_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<LeadId>,
    Json(input): Json<UpdateLeadStatusRequest>,
) -> AppResult<Json<DataResponse<Lead>>> {
    let status = LeadStatus::parse(&input.status)?;

    let lead = LeadRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Lead",
                id: id.to_string(),
            })
        })?;

    tracing::info!(lead_id = %id, status = %status, operator_id = admin.operator.id, "Lead status updated");
    Ok(Json(DataResponse { data: lead }))
}
