use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{HouseholdQuery, MessageResponse, ShoppingList};
use crate::routes::{require_household_id, AppState};
use crate::services::{RecordKey, Table};

/// Configure shopping list routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/shopping-lists")
            .route(web::get().to(list_shopping_lists))
            .route(web::post().to(create_shopping_list)),
    )
    .service(
        web::resource("/shopping-lists/{list_id}")
            .route(web::get().to(get_shopping_list))
            .route(web::put().to(replace_shopping_list))
            .route(web::delete().to(delete_shopping_list)),
    );
}

/// Give every product an id so the client can toggle it later
fn assign_product_ids(list: &mut ShoppingList) {
    for product in list.products.iter_mut().filter(|p| p.product_id.is_none()) {
        product.product_id = Some(Uuid::new_v4().to_string());
    }
}

async fn list_shopping_lists(
    state: web::Data<AppState>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let household_id = require_household_id(query.household_id.as_deref(), None)?;

    let lists: Vec<ShoppingList> = state
        .records
        .query(Table::ShoppingLists, &household_id)
        .await
        .map_err(ApiError::internal("Error fetching shopping lists"))?;

    Ok(HttpResponse::Ok().json(json!({ "shoppingLists": lists })))
}

async fn get_shopping_list(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let household_id = require_household_id(query.household_id.as_deref(), None)?;
    let list_id = path.into_inner();

    let list: ShoppingList = state
        .records
        .get(Table::ShoppingLists, &RecordKey::with_sort(household_id, list_id))
        .await
        .map_err(ApiError::internal("Error fetching shopping list"))?
        .ok_or_else(|| ApiError::not_found("Shopping list not found"))?;

    Ok(HttpResponse::Ok().json(list))
}

async fn create_shopping_list(
    state: web::Data<AppState>,
    query: web::Query<HouseholdQuery>,
    body: web::Json<ShoppingList>,
) -> Result<HttpResponse, ApiError> {
    let mut list = body.into_inner();
    list.household_id = require_household_id(query.household_id.as_deref(), Some(list.household_id.as_str()))?;
    list.list_id = Uuid::new_v4().to_string();
    assign_product_ids(&mut list);

    state
        .records
        .put(
            Table::ShoppingLists,
            &RecordKey::with_sort(list.household_id.as_str(), list.list_id.as_str()),
            &list,
        )
        .await
        .map_err(ApiError::internal("Error creating shopping list"))?;

    tracing::debug!("Created shopping list {} for household {}", list.list_id, list.household_id);

    Ok(HttpResponse::Created().json(list))
}

/// Full replace of a shopping list
async fn replace_shopping_list(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HouseholdQuery>,
    body: web::Json<ShoppingList>,
) -> Result<HttpResponse, ApiError> {
    let mut list = body.into_inner();
    list.household_id = require_household_id(query.household_id.as_deref(), Some(list.household_id.as_str()))?;
    list.list_id = path.into_inner();
    assign_product_ids(&mut list);

    state
        .records
        .put(
            Table::ShoppingLists,
            &RecordKey::with_sort(list.household_id.as_str(), list.list_id.as_str()),
            &list,
        )
        .await
        .map_err(ApiError::internal("Error updating shopping list"))?;

    Ok(HttpResponse::Ok().json(list))
}

async fn delete_shopping_list(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let household_id = require_household_id(query.household_id.as_deref(), None)?;
    let list_id = path.into_inner();

    state
        .records
        .delete::<ShoppingList>(Table::ShoppingLists, &RecordKey::with_sort(household_id, list_id))
        .await
        .map_err(ApiError::internal("Error deleting shopping list"))?
        .ok_or_else(|| ApiError::not_found("Shopping list not found"))?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Shopping list deleted")))
}
