use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{timestamp_now, CreateHouseholdRequest, Household, HouseholdQuery, User};
use crate::routes::{non_empty, validate_request, AppState};
use crate::services::{RecordKey, Table};

/// Configure household routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/households", web::post().to(create_household))
        .route("/households/users", web::get().to(list_household_users));
}

/// Short household identifier
fn new_household_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Six-digit code other users join with
fn new_join_code() -> String {
    Uuid::new_v4().as_u128().to_string()[..6].to_string()
}

/// Create a household, making the creator its first admin and member
///
/// POST /api/v1/households
///
/// Request body:
/// ```json
/// { "HouseholdName": "string", "UserID": "string" }
/// ```
async fn create_household(
    state: web::Data<AppState>,
    req: web::Json<CreateHouseholdRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&*req, "HouseholdName is required")?;

    let creator = non_empty(req.user_id.as_deref()).map(str::to_string);
    let founders: Vec<String> = creator.iter().cloned().collect();

    let household = Household {
        household_id: new_household_id(),
        name: req.household_name.clone(),
        join_code: new_join_code(),
        created_at: Some(timestamp_now()),
        admins: founders.clone(),
        members: founders,
        tasks: None,
    };

    state
        .records
        .put(Table::Households, &RecordKey::new(household.household_id.as_str()), &household)
        .await
        .map_err(ApiError::internal("Error creating household"))?;

    if let Some(user_id) = creator {
        let key = RecordKey::new(user_id.as_str());
        let user: Option<User> = state
            .records
            .get(Table::Users, &key)
            .await
            .map_err(ApiError::internal("Error creating household"))?;

        match user {
            Some(mut user) => {
                user.household_id = Some(household.household_id.clone());
                state
                    .records
                    .put(Table::Users, &key, &user)
                    .await
                    .map_err(ApiError::internal("Error creating household"))?;
            }
            None => tracing::warn!(
                "Household {} created by unknown user {}",
                household.household_id,
                user_id
            ),
        }
    }

    tracing::info!("Created household {} ({})", household.household_id, household.name);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Household created successfully",
        "HouseholdID": household.household_id,
        "JoinCode": household.join_code,
    })))
}

/// Users belonging to a household
///
/// GET /api/v1/households/users?HouseholdID={id}
async fn list_household_users(
    state: web::Data<AppState>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let household_id = non_empty(query.household_id.as_deref())
        .ok_or_else(|| ApiError::bad_request("Missing HouseholdID query param"))?;

    let users: Vec<User> = state
        .records
        .scan(Table::Users)
        .await
        .map_err(ApiError::internal("Error fetching household users"))?;

    let members: Vec<User> = users
        .into_iter()
        .filter(|u| u.household_id.as_deref() == Some(household_id))
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "users": members })))
}
