use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{timestamp_now, CreateUserRequest, Numeric, UpdateUserRequest, User};
use crate::routes::{validate_request, AppState};
use crate::services::{CacheKey, RecordKey, Table};

/// Configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users")
            .route(web::post().to(create_user))
            .route(web::put().to(update_user)),
    )
    .service(
        web::resource("/users/{user_id}")
            .route(web::get().to(get_user))
            .route(web::delete().to(delete_user)),
    );
}

/// Register a user record
///
/// POST /api/v1/users
///
/// Accepts either record field names (`UserID`, `Name`, ...) or sign-up
/// attribute names (`sub`, `name`, `custom:College`, ...).
async fn create_user(
    state: web::Data<AppState>,
    req: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&*req, "UserID is required in request body")?;
    let req = req.into_inner();

    let latitude = req.latitude.unwrap_or_else(|| Numeric::from(0.0));
    let longitude = req.longitude.unwrap_or_else(|| Numeric::from(0.0));
    if latitude.as_finite_f64().is_none() || longitude.as_finite_f64().is_none() {
        return Err(ApiError::bad_request("Invalid coordinates"));
    }

    let unknown = || "Unknown".to_string();
    let user = User {
        user_id: req.user_id,
        name: Some(req.name.unwrap_or_else(unknown)),
        email: Some(req.email.unwrap_or_else(unknown)),
        area_of_study: Some(req.area_of_study.unwrap_or_else(unknown)),
        college: Some(req.college.unwrap_or_else(unknown)),
        created_at: Some(timestamp_now()),
        do_not_disturb: false,
        household_id: None,
        latitude: Some(latitude),
        longitude: Some(longitude),
        phone_number: None,
        bio: None,
    };

    state
        .records
        .put(Table::Users, &RecordKey::new(user.user_id.as_str()), &user)
        .await
        .map_err(ApiError::internal("Error saving user"))?;

    invalidate_display_name(&state, &user.user_id).await;
    tracing::info!("User {} saved", user.user_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "User added", "user": user })))
}

/// Fetch a user record
///
/// GET /api/v1/users/{userID}
async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let user: User = state
        .records
        .get(Table::Users, &RecordKey::new(user_id.as_str()))
        .await
        .map_err(ApiError::internal("Internal Server Error"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(user))
}

/// Partially update a user record
///
/// PUT /api/v1/users
///
/// Request body: `UserID` plus any of the editable user fields. Unknown
/// fields are rejected with 400.
async fn update_user(
    state: web::Data<AppState>,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    if !req.has_changes() {
        return Err(ApiError::bad_request("No fields provided to update"));
    }
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for update_user request: field_errors={:?}", errors);
        return Err(ApiError::bad_request(errors.to_string()));
    }

    let key = RecordKey::new(req.user_id.as_str());
    let mut user: User = state
        .records
        .get(Table::Users, &key)
        .await
        .map_err(ApiError::internal("Internal Server Error"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    req.apply_to(&mut user);

    state
        .records
        .put(Table::Users, &key, &user)
        .await
        .map_err(ApiError::internal("Internal Server Error"))?;

    invalidate_display_name(&state, &user.user_id).await;
    tracing::debug!("Updated user {}", user.user_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "User updated successfully",
        "UpdatedItem": user,
    })))
}

/// Delete a user record
///
/// DELETE /api/v1/users/{userID}
///
/// The stored item is returned as-is, so records written with odd attribute
/// types can still be removed.
async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let deleted: Value = state
        .records
        .delete(Table::Users, &RecordKey::new(user_id.as_str()))
        .await
        .map_err(ApiError::internal("Internal Server Error"))?
        .ok_or_else(|| ApiError::not_found("User not found or already deleted"))?;

    invalidate_display_name(&state, &user_id).await;
    tracing::info!("Deleted user {}", user_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "User deleted successfully",
        "DeletedItem": deleted,
    })))
}

async fn invalidate_display_name(state: &AppState, user_id: &str) {
    if let Err(e) = state.cache.delete(&CacheKey::display_name(user_id)).await {
        tracing::warn!("Failed to invalidate display name cache: {}", e);
    }
}
