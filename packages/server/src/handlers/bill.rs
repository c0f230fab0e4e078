use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{Datelike, Utc};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::bill::*;
use crate::repository::{Bill, next_bill_number};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Bills",
    operation_id = "createBill",
    summary = "Create a bill",
    description = "Records a spraying job. `bill_number` is generated as `BILL-<year>-<seq>` when omitted.",
    request_body = CreateBillRequest,
    responses(
        (status = 201, description = "Bill created", body = BillResponse),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Bill number already exists (CONFLICT)", body = ErrorBody),
        (status = 422, description = "Invalid fields (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(farmer = %payload.farmer_name))]
pub async fn create_bill(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBillRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_bill(&payload)?;

    let now = Utc::now();
    let bill_number = match payload.bill_number {
        Some(number) => number.trim().to_string(),
        None => next_bill_number(&*state.bills, now.year()).await?,
    };

    let bill = Bill {
        id: Uuid::now_v7(),
        bill_number,
        farmer_name: payload.farmer_name.trim().to_string(),
        operator_id: payload.operator_id.trim().to_string(),
        drone_id: payload.drone_id.trim().to_string(),
        acres: payload.acres,
        duration_hours: payload.duration_hours,
        amount: payload.amount,
        payment_mode: payload.payment_mode,
        created_at: now,
        updated_at: None,
    };

    let created = state.bills.insert(bill).await?;
    Ok((StatusCode::CREATED, Json(BillResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Bills",
    operation_id = "listBills",
    summary = "List bills",
    description = "Returns bills newest first. `operator_id` and `drone_id` match exactly; `farmer_name` matches a case-insensitive substring.",
    params(BillListQuery),
    responses(
        (status = 200, description = "List of bills", body = Vec<BillResponse>),
        (status = 400, description = "Invalid paging (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_bills(
    State(state): State<AppState>,
    Query(query): Query<BillListQuery>,
) -> Result<Json<Vec<BillResponse>>, AppError> {
    let filter = query.into_filter()?;
    let bills = state.bills.list(&filter).await?;
    Ok(Json(bills.into_iter().map(BillResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Bills",
    operation_id = "getBill",
    summary = "Get a bill by ID",
    params(("id" = Uuid, Path, description = "Bill ID")),
    responses(
        (status = 200, description = "Bill details", body = BillResponse),
        (status = 404, description = "Bill not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BillResponse>, AppError> {
    Ok(Json(state.bills.get(id).await?.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Bills",
    operation_id = "updateBill",
    summary = "Update a bill",
    description = "Partially updates a bill. Only provided fields are modified; an empty payload is rejected.",
    params(("id" = Uuid, Path, description = "Bill ID")),
    request_body = UpdateBillRequest,
    responses(
        (status = 200, description = "Bill updated", body = BillResponse),
        (status = 400, description = "Empty or malformed body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Bill not found (NOT_FOUND)", body = ErrorBody),
        (status = 422, description = "Invalid fields (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_bill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateBillRequest>,
) -> Result<Json<BillResponse>, AppError> {
    validate_update_bill(&payload)?;
    let updated = state.bills.update(id, &payload).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Bills",
    operation_id = "deleteBill",
    summary = "Delete a bill",
    params(("id" = Uuid, Path, description = "Bill ID")),
    responses(
        (status = 204, description = "Bill deleted"),
        (status = 404, description = "Bill not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_bill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.bills.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
