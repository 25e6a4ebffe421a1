use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::core::money::{equal_share, Amount, AmountError};
use crate::error::ApiError;
use crate::models::{Bill, HouseholdQuery, MessageResponse, Numeric, Split};
use crate::routes::{require_household_id, AppState};
use crate::services::{RecordKey, Table};

/// Configure shared bill routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/bills")
            .route(web::get().to(list_bills))
            .route(web::post().to(create_bill)),
    )
    .service(
        web::resource("/bills/{bill_id}")
            .route(web::get().to(get_bill))
            .route(web::put().to(update_bill))
            .route(web::delete().to(delete_bill)),
    );
}

/// Parse an optional amount; absent stays absent
fn parse_amount(value: Option<&Numeric>) -> Result<Option<Amount>, AmountError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let text = value
        .as_decimal_text()
        .ok_or_else(|| AmountError::Invalid(format!("{:?}", value)))?;
    Amount::parse(&text).map(Some)
}

/// Equal splits across the bill's members, rounded to the cent
fn equal_splits(total: &Amount, members: &[String], paid_members: &[String]) -> Option<Vec<Split>> {
    let share = equal_share(total, members.len())?;

    Some(
        members
            .iter()
            .map(|member| Split {
                user_id: member.clone(),
                share: Numeric::from_decimal_text(&share),
                paid: paid_members.contains(member),
            })
            .collect(),
    )
}

async fn list_bills(
    state: web::Data<AppState>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let household_id = require_household_id(query.household_id.as_deref(), None)?;

    let bills: Vec<Bill> = state
        .records
        .query(Table::Bills, &household_id)
        .await
        .map_err(ApiError::internal("Error fetching bills"))?;

    Ok(HttpResponse::Ok().json(json!({ "bills": bills })))
}

async fn get_bill(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let household_id = require_household_id(query.household_id.as_deref(), None)?;

    let bill: Bill = state
        .records
        .get(Table::Bills, &RecordKey::with_sort(household_id, path.into_inner()))
        .await
        .map_err(ApiError::internal("Error fetching bill"))?
        .ok_or_else(|| ApiError::not_found("Bill not found"))?;

    Ok(HttpResponse::Ok().json(bill))
}

/// Create a bill
///
/// POST /api/v1/bills
///
/// Without explicit `Splits`, a positive `TotalAmount` is divided equally
/// between `Members`.
async fn create_bill(
    state: web::Data<AppState>,
    query: web::Query<HouseholdQuery>,
    body: web::Json<Bill>,
) -> Result<HttpResponse, ApiError> {
    let mut bill = body.into_inner();
    bill.household_id = require_household_id(query.household_id.as_deref(), Some(bill.household_id.as_str()))?;
    bill.bill_id = Uuid::new_v4().to_string();

    let total = parse_amount(bill.total_amount.as_ref())
        .map_err(|_| ApiError::bad_request("Invalid TotalAmount value"))?;

    let members = bill.members.get_or_insert_with(Vec::new).clone();
    let paid_members = bill.paid_members.get_or_insert_with(Vec::new).clone();

    if bill.splits.is_none() {
        if let Some(total) = total.filter(|t| t.is_positive()) {
            bill.splits = equal_splits(&total, &members, &paid_members);
        }
    }

    state
        .records
        .put(
            Table::Bills,
            &RecordKey::with_sort(bill.household_id.as_str(), bill.bill_id.as_str()),
            &bill,
        )
        .await
        .map_err(ApiError::internal("Error creating bill"))?;

    tracing::debug!("Created bill {} for household {}", bill.bill_id, bill.household_id);

    Ok(HttpResponse::Created().json(bill))
}

/// Update a bill, keeping stored membership when the body omits it
///
/// PUT /api/v1/bills/{billID}
async fn update_bill(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HouseholdQuery>,
    body: web::Json<Bill>,
) -> Result<HttpResponse, ApiError> {
    let mut bill = body.into_inner();
    bill.household_id = require_household_id(query.household_id.as_deref(), Some(bill.household_id.as_str()))?;
    bill.bill_id = path.into_inner();

    parse_amount(bill.total_amount.as_ref())
        .map_err(|_| ApiError::bad_request("Invalid TotalAmount value"))?;

    let invalid_share = bill
        .splits
        .iter()
        .flatten()
        .any(|split| parse_amount(Some(&split.share)).is_err());
    if invalid_share {
        return Err(ApiError::bad_request("Invalid Share value in splits"));
    }

    let key = RecordKey::with_sort(bill.household_id.as_str(), bill.bill_id.as_str());
    let existing: Bill = state
        .records
        .get(Table::Bills, &key)
        .await
        .map_err(ApiError::internal("Error updating bill"))?
        .ok_or_else(|| ApiError::not_found("Bill not found"))?;

    if bill.members.is_none() {
        bill.members = Some(existing.members.unwrap_or_default());
    }
    if bill.paid_members.is_none() {
        bill.paid_members = Some(existing.paid_members.unwrap_or_default());
    }

    state
        .records
        .put(Table::Bills, &key, &bill)
        .await
        .map_err(ApiError::internal("Error updating bill"))?;

    Ok(HttpResponse::Ok().json(bill))
}

async fn delete_bill(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let household_id = require_household_id(query.household_id.as_deref(), None)?;

    state
        .records
        .delete::<Bill>(Table::Bills, &RecordKey::with_sort(household_id, path.into_inner()))
        .await
        .map_err(ApiError::internal("Error deleting bill"))?
        .ok_or_else(|| ApiError::not_found("Bill not found"))?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Bill deleted")))
}
