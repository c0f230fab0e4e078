use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::bill::{self, PaymentMode};
use crate::error::{AppError, FieldError};

use super::shared::{MAX_TEXT_LEN, check_len, check_not_blank};

pub const DEFAULT_LIST_LIMIT: u64 = 100;
pub const MAX_LIST_LIMIT: u64 = 200;

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateBillRequest {
    /// Generated as `BILL-<year>-<seq>` when omitted.
    #[schema(example = "BILL-2024-001")]
    pub bill_number: Option<String>,
    #[schema(example = "Rajesh Kumar")]
    pub farmer_name: String,
    #[schema(example = "operator-001")]
    pub operator_id: String,
    #[schema(example = "drone-01")]
    pub drone_id: String,
    #[schema(example = 5.0)]
    pub acres: f64,
    #[schema(example = 2.5)]
    pub duration_hours: f64,
    #[schema(example = 1250.0)]
    pub amount: f64,
    pub payment_mode: PaymentMode,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateBillRequest {
    pub farmer_name: Option<String>,
    pub operator_id: Option<String>,
    pub drone_id: Option<String>,
    pub acres: Option<f64>,
    pub duration_hours: Option<f64>,
    pub amount: Option<f64>,
    pub payment_mode: Option<PaymentMode>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BillListQuery {
    /// Exact operator ID.
    pub operator_id: Option<String>,
    /// Exact drone ID.
    pub drone_id: Option<String>,
    /// Case-insensitive substring of the farmer name.
    pub farmer_name: Option<String>,
    /// Number of bills to skip (default 0).
    pub skip: Option<u64>,
    /// Maximum number of bills (1-200, default 100).
    pub limit: Option<u64>,
}

/// Resolved list filter passed to a bill repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillFilter {
    pub operator_id: Option<String>,
    pub drone_id: Option<String>,
    pub farmer_name: Option<String>,
    pub skip: u64,
    pub limit: u64,
}

impl BillListQuery {
    pub fn into_filter(self) -> Result<BillFilter, AppError> {
        let limit = self.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_LIST_LIMIT}"
            )));
        }
        let non_blank = |s: Option<String>| {
            s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };
        Ok(BillFilter {
            operator_id: non_blank(self.operator_id),
            drone_id: non_blank(self.drone_id),
            farmer_name: non_blank(self.farmer_name),
            skip: self.skip.unwrap_or(0),
            limit,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct BillResponse {
    pub id: Uuid,
    pub bill_number: String,
    pub farmer_name: String,
    pub operator_id: String,
    pub drone_id: String,
    pub acres: f64,
    pub duration_hours: f64,
    pub amount: f64,
    pub payment_mode: PaymentMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<bill::Model> for BillResponse {
    fn from(m: bill::Model) -> Self {
        Self {
            id: m.id,
            bill_number: m.bill_number,
            farmer_name: m.farmer_name,
            operator_id: m.operator_id,
            drone_id: m.drone_id,
            acres: m.acres,
            duration_hours: m.duration_hours,
            amount: m.amount,
            payment_mode: m.payment_mode,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn check_positive(errors: &mut Vec<FieldError>, field: &str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(FieldError::new(field, "Must be greater than 0"));
    }
}

pub fn validate_create_bill(req: &CreateBillRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if let Some(number) = &req.bill_number {
        check_not_blank(&mut errors, "bill_number", number);
        check_len(&mut errors, "bill_number", number, MAX_TEXT_LEN);
    }
    check_not_blank(&mut errors, "farmer_name", &req.farmer_name);
    check_len(&mut errors, "farmer_name", &req.farmer_name, MAX_TEXT_LEN);
    check_not_blank(&mut errors, "operator_id", &req.operator_id);
    check_len(&mut errors, "operator_id", &req.operator_id, MAX_TEXT_LEN);
    check_not_blank(&mut errors, "drone_id", &req.drone_id);
    check_len(&mut errors, "drone_id", &req.drone_id, MAX_TEXT_LEN);
    check_positive(&mut errors, "acres", req.acres);
    check_positive(&mut errors, "duration_hours", req.duration_hours);
    check_positive(&mut errors, "amount", req.amount);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidFields(errors))
    }
}

/// Empty updates are rejected outright; present fields follow the create rules.
pub fn validate_update_bill(req: &UpdateBillRequest) -> Result<(), AppError> {
    if *req == UpdateBillRequest::default() {
        return Err(AppError::Validation("No fields to update".into()));
    }

    let mut errors = Vec::new();
    if let Some(name) = &req.farmer_name {
        check_not_blank(&mut errors, "farmer_name", name);
        check_len(&mut errors, "farmer_name", name, MAX_TEXT_LEN);
    }
    if let Some(op) = &req.operator_id {
        check_not_blank(&mut errors, "operator_id", op);
        check_len(&mut errors, "operator_id", op, MAX_TEXT_LEN);
    }
    if let Some(drone) = &req.drone_id {
        check_not_blank(&mut errors, "drone_id", drone);
        check_len(&mut errors, "drone_id", drone, MAX_TEXT_LEN);
    }
    if let Some(acres) = req.acres {
        check_positive(&mut errors, "acres", acres);
    }
    if let Some(hours) = req.duration_hours {
        check_positive(&mut errors, "duration_hours", hours);
    }
    if let Some(amount) = req.amount {
        check_positive(&mut errors, "amount", amount);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidFields(errors))
    }
}
