use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    ApprovalStatus, HouseholdQuery, MessageResponse, Reservation, ReviewReservationRequest,
    UpdateReservationRequest,
};
use crate::routes::{non_empty, require_household_id, AppState};
use crate::services::{RecordKey, Table};

/// Configure shared space reservation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/reservations")
            .route(web::get().to(list_reservations))
            .route(web::post().to(create_reservation)),
    )
    .service(
        web::resource("/reservations/{reservation_id}")
            .route(web::put().to(update_reservation))
            .route(web::delete().to(delete_reservation)),
    )
    .service(
        web::resource("/reservations/{reservation_id}/approve")
            .route(web::patch().to(review_reservation)),
    );
}

async fn load_reservation(
    state: &AppState,
    key: &RecordKey,
    context: &'static str,
) -> Result<Reservation, ApiError> {
    state
        .records
        .get(Table::Reservations, key)
        .await
        .map_err(ApiError::internal(context))?
        .ok_or_else(|| ApiError::not_found("Reservation not found"))
}

fn parse_action(action: &str) -> Option<ApprovalStatus> {
    match action {
        "Approve" => Some(ApprovalStatus::Approved),
        "Reject" => Some(ApprovalStatus::Rejected),
        _ => None,
    }
}

async fn list_reservations(
    state: web::Data<AppState>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let household_id = require_household_id(query.household_id.as_deref(), None)?;

    let reservations: Vec<Reservation> = state
        .records
        .query(Table::Reservations, &household_id)
        .await
        .map_err(ApiError::internal("Error fetching reservations"))?;

    Ok(HttpResponse::Ok().json(json!({ "reservations": reservations })))
}

/// Request a shared space; new reservations start out pending
///
/// POST /api/v1/reservations
async fn create_reservation(
    state: web::Data<AppState>,
    query: web::Query<HouseholdQuery>,
    body: web::Json<Reservation>,
) -> Result<HttpResponse, ApiError> {
    let mut reservation = body.into_inner();
    reservation.household_id =
        require_household_id(query.household_id.as_deref(), Some(reservation.household_id.as_str()))?;
    reservation.reservation_id = Uuid::new_v4().to_string();
    reservation.approval_status = Some(ApprovalStatus::Pending);
    reservation.approvers = Some(Vec::new());

    state
        .records
        .put(
            Table::Reservations,
            &RecordKey::with_sort(
                reservation.household_id.as_str(),
                reservation.reservation_id.as_str(),
            ),
            &reservation,
        )
        .await
        .map_err(ApiError::internal("Error creating reservation"))?;

    tracing::debug!(
        "Reservation {} requested by {:?}",
        reservation.reservation_id,
        reservation.reserved_by
    );

    Ok(HttpResponse::Created().json(reservation))
}

/// Edit a reservation; only the user who made it may do so
///
/// PUT /api/v1/reservations/{reservationID}
///
/// The body carries the editor's id as `RequestUserID` next to the
/// reservation fields.
async fn update_reservation(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HouseholdQuery>,
    body: web::Json<UpdateReservationRequest>,
) -> Result<HttpResponse, ApiError> {
    let UpdateReservationRequest {
        request_user_id,
        mut reservation,
    } = body.into_inner();

    reservation.household_id =
        require_household_id(query.household_id.as_deref(), Some(reservation.household_id.as_str()))?;
    reservation.reservation_id = path.into_inner();

    let requester = non_empty(request_user_id.as_deref())
        .ok_or_else(|| ApiError::bad_request("Missing RequestUserID in request body"))?;

    let key = RecordKey::with_sort(
        reservation.household_id.as_str(),
        reservation.reservation_id.as_str(),
    );
    let existing = load_reservation(&state, &key, "Error updating reservation").await?;

    if existing.reserved_by.as_deref() != Some(requester) {
        tracing::info!(
            "User {} tried to edit reservation {} owned by {:?}",
            requester,
            reservation.reservation_id,
            existing.reserved_by
        );
        return Err(ApiError::forbidden("You are not allowed to edit this reservation."));
    }

    if reservation.approval_status.is_none() {
        reservation.approval_status = Some(existing.approval_status.unwrap_or(ApprovalStatus::Pending));
    }
    if reservation.approvers.is_none() {
        reservation.approvers = Some(existing.approvers.unwrap_or_default());
    }

    state
        .records
        .put(Table::Reservations, &key, &reservation)
        .await
        .map_err(ApiError::internal("Error updating reservation"))?;

    Ok(HttpResponse::Ok().json(reservation))
}

/// DELETE /api/v1/reservations/{reservationID}?HouseholdID={id}&UserID={id}
async fn delete_reservation(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let household_id = require_household_id(query.household_id.as_deref(), None)?;
    let requester = non_empty(query.user_id.as_deref())
        .ok_or_else(|| ApiError::bad_request("Missing UserID in query parameters"))?;

    let key = RecordKey::with_sort(household_id, path.into_inner());
    let existing = load_reservation(&state, &key, "Error deleting reservation").await?;

    if existing.reserved_by.as_deref() != Some(requester) {
        return Err(ApiError::forbidden("You are not allowed to delete this reservation."));
    }

    state
        .records
        .delete::<Reservation>(Table::Reservations, &key)
        .await
        .map_err(ApiError::internal("Error deleting reservation"))?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Reservation deleted")))
}

/// Approve or reject a reservation
///
/// PATCH /api/v1/reservations/{reservationID}/approve
///
/// Request body:
/// ```json
/// { "Action": "Approve", "UserID": "string" }
/// ```
async fn review_reservation(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HouseholdQuery>,
    body: web::Json<ReviewReservationRequest>,
) -> Result<HttpResponse, ApiError> {
    let household_id =
        require_household_id(query.household_id.as_deref(), body.household_id.as_deref())?;

    let (Some(action), Some(reviewer)) = (
        non_empty(body.action.as_deref()),
        non_empty(body.user_id.as_deref()),
    ) else {
        return Err(ApiError::bad_request("Missing Action or UserID in request body"));
    };

    let key = RecordKey::with_sort(household_id, path.into_inner());
    let mut reservation = load_reservation(&state, &key, "Error reviewing reservation").await?;

    let status = parse_action(action).ok_or_else(|| ApiError::bad_request("Invalid Action"))?;

    let approvers = reservation.approvers.get_or_insert_with(Vec::new);
    if !approvers.iter().any(|a| a == reviewer) {
        approvers.push(reviewer.to_string());
    }
    reservation.approval_status = Some(status);

    state
        .records
        .put(Table::Reservations, &key, &reservation)
        .await
        .map_err(ApiError::internal("Error reviewing reservation"))?;

    tracing::info!("Reservation {} {:?} by {}", reservation.reservation_id, status, reviewer);

    Ok(HttpResponse::Ok().json(reservation))
}
