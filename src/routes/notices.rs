use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{timestamp_now, HouseholdQuery, MessageResponse, Notice};
use crate::routes::{require_household_id, AppState};
use crate::services::{RecordKey, Table};

/// Configure household noticeboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/notices")
            .route(web::get().to(list_notices))
            .route(web::post().to(create_notice)),
    )
    .service(
        web::resource("/notices/{notice_id}")
            .route(web::put().to(update_notice))
            .route(web::delete().to(delete_notice)),
    );
}

async fn list_notices(
    state: web::Data<AppState>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let household_id = require_household_id(query.household_id.as_deref(), None)?;

    let notices: Vec<Notice> = state
        .records
        .query(Table::Notices, &household_id)
        .await
        .map_err(ApiError::internal("Error fetching notices"))?;

    Ok(HttpResponse::Ok().json(json!({ "notices": notices })))
}

async fn create_notice(
    state: web::Data<AppState>,
    query: web::Query<HouseholdQuery>,
    body: web::Json<Notice>,
) -> Result<HttpResponse, ApiError> {
    let mut notice = body.into_inner();
    notice.household_id = require_household_id(query.household_id.as_deref(), Some(notice.household_id.as_str()))?;
    notice.notice_id = Uuid::new_v4().to_string();
    notice.created_at = Some(timestamp_now());

    state
        .records
        .put(
            Table::Notices,
            &RecordKey::with_sort(notice.household_id.as_str(), notice.notice_id.as_str()),
            &notice,
        )
        .await
        .map_err(ApiError::internal("Error creating notice"))?;

    Ok(HttpResponse::Created().json(notice))
}

/// PUT /api/v1/notices/{noticeID}
async fn update_notice(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HouseholdQuery>,
    body: web::Json<Notice>,
) -> Result<HttpResponse, ApiError> {
    let mut notice = body.into_inner();
    notice.household_id = require_household_id(query.household_id.as_deref(), Some(notice.household_id.as_str()))?;
    notice.notice_id = path.into_inner();

    let key = RecordKey::with_sort(notice.household_id.as_str(), notice.notice_id.as_str());
    let existing: Notice = state
        .records
        .get(Table::Notices, &key)
        .await
        .map_err(ApiError::internal("Error updating notice"))?
        .ok_or_else(|| ApiError::not_found("Notice not found"))?;

    if notice.created_at.is_none() {
        notice.created_at = existing.created_at;
    }

    state
        .records
        .put(Table::Notices, &key, &notice)
        .await
        .map_err(ApiError::internal("Error updating notice"))?;

    Ok(HttpResponse::Ok().json(notice))
}

async fn delete_notice(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let household_id = require_household_id(query.household_id.as_deref(), None)?;

    state
        .records
        .delete::<Notice>(Table::Notices, &RecordKey::with_sort(household_id, path.into_inner()))
        .await
        .map_err(ApiError::internal("Error deleting notice"))?
        .ok_or_else(|| ApiError::not_found("Notice not found"))?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Notice deleted")))
}
