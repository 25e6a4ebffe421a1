use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{CreateTaskRequest, Household, HouseholdQuery, Task, UpdateTaskRequest};
use crate::routes::{non_empty, validate_request, AppState};
use crate::services::{RecordKey, Table};

/// Configure cleaning rota routes
///
/// Tasks are stored inside their household record.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/tasks")
            .route(web::get().to(list_tasks))
            .route(web::post().to(add_task)),
    )
    .service(
        web::resource("/tasks/{task_id}")
            .route(web::put().to(update_task))
            .route(web::delete().to(delete_task)),
    );
}

async fn load_household(
    state: &AppState,
    household_id: &str,
    context: &'static str,
) -> Result<Option<Household>, ApiError> {
    state
        .records
        .get(Table::Households, &RecordKey::new(household_id))
        .await
        .map_err(ApiError::internal(context))
}

async fn save_household(
    state: &AppState,
    household: &Household,
    context: &'static str,
) -> Result<(), ApiError> {
    state
        .records
        .put(Table::Households, &RecordKey::new(household.household_id.as_str()), household)
        .await
        .map_err(ApiError::internal(context))
}

/// POST /api/v1/tasks
async fn add_task(
    state: web::Data<AppState>,
    req: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&*req, "Missing required fields")?;
    let req = req.into_inner();

    let mut household = load_household(&state, &req.household_id, "Error adding task")
        .await?
        .ok_or_else(|| ApiError::not_found("Household not found"))?;

    let task = Task {
        task_id: Uuid::new_v4().to_string(),
        title: req.title,
        assigned_to: req.assigned_to,
        frequency: req.frequency,
        due_date: req.due_date,
        completed: false,
    };

    household.tasks.get_or_insert_with(Vec::new).push(task.clone());
    save_household(&state, &household, "Error adding task").await?;

    tracing::debug!("Added task {} to household {}", task.task_id, household.household_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Task added", "task": task })))
}

/// GET /api/v1/tasks?HouseholdID={id}
async fn list_tasks(
    state: web::Data<AppState>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let household_id = non_empty(query.household_id.as_deref())
        .ok_or_else(|| ApiError::bad_request("Missing HouseholdID"))?;

    let tasks = load_household(&state, household_id, "Error fetching tasks")
        .await?
        .and_then(|h| h.tasks)
        .ok_or_else(|| ApiError::not_found("No tasks found"))?;

    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

/// Replace a task's fields
///
/// PUT /api/v1/tasks/{taskID}
async fn update_task(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    validate_request(&*req, "HouseholdID is required")?;
    let task_id = path.into_inner();
    let req = req.into_inner();

    let mut household = load_household(&state, &req.household_id, "Error updating task")
        .await?
        .filter(|h| h.tasks.is_some())
        .ok_or_else(|| ApiError::not_found("No tasks found for that Household"))?;

    let task = household
        .tasks
        .iter_mut()
        .flatten()
        .find(|t| t.task_id == task_id)
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    task.title = req.title;
    task.assigned_to = req.assigned_to;
    task.frequency = req.frequency;
    task.due_date = req.due_date;
    task.completed = req.completed;

    save_household(&state, &household, "Error updating task").await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Task updated", "tasks": household.tasks })))
}

/// DELETE /api/v1/tasks/{taskID}?HouseholdID={id}
async fn delete_task(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HouseholdQuery>,
) -> Result<HttpResponse, ApiError> {
    let task_id = path.into_inner();
    let household_id = non_empty(query.household_id.as_deref())
        .ok_or_else(|| ApiError::bad_request("Missing HouseholdID"))?;

    let mut household = load_household(&state, household_id, "Error deleting task")
        .await?
        .filter(|h| h.tasks.is_some())
        .ok_or_else(|| ApiError::not_found("Household or tasks not found"))?;

    let remaining: Vec<Task> = household
        .tasks
        .take()
        .unwrap_or_default()
        .into_iter()
        .filter(|t| t.task_id != task_id)
        .collect();
    household.tasks = Some(remaining.clone());

    save_household(&state, &household, "Error deleting task").await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted", "tasks": remaining })))
}
