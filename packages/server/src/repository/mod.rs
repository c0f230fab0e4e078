//! Storage for billing records.
//!
//! Handlers only see [`BillRepository`]; the backend is chosen at startup
//! from `billing.backend`.

mod database;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::models::bill::{BillFilter, UpdateBillRequest};

pub use crate::entity::bill::Model as Bill;
pub use database::DatabaseBillRepository;
pub use memory::InMemoryBillRepository;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("bill {0} not found")]
    NotFound(Uuid),

    #[error("bill number {0} already exists")]
    Duplicate(String),

    #[error("bill numbers for {0} are exhausted")]
    SequenceExhausted(i32),

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

#[async_trait]
pub trait BillRepository: Send + Sync {
    /// Store a new bill. Fails with `Duplicate` if its number is taken.
    async fn insert(&self, bill: Bill) -> Result<Bill, RepositoryError>;

    async fn get(&self, id: Uuid) -> Result<Bill, RepositoryError>;

    /// Matching bills, newest first.
    async fn list(&self, filter: &BillFilter) -> Result<Vec<Bill>, RepositoryError>;

    async fn update(&self, id: Uuid, patch: &UpdateBillRequest) -> Result<Bill, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;

    /// Highest sequence number used under `BILL-<year>-`, or 0.
    async fn last_sequence(&self, year: i32) -> Result<u32, RepositoryError>;
}

/// `BILL-<year>-<seq>` with at least three sequence digits.
pub fn format_bill_number(year: i32, seq: u32) -> String {
    format!("{}{seq:03}", bill_number_prefix(year))
}

pub(crate) fn bill_number_prefix(year: i32) -> String {
    format!("BILL-{year}-")
}

/// Sequence part of a bill number generated for `year`.
pub(crate) fn parse_sequence(number: &str, year: i32) -> Option<u32> {
    number
        .strip_prefix(&bill_number_prefix(year))
        .and_then(|seq| seq.parse().ok())
}

/// The next free generated number for `year`.
pub async fn next_bill_number(
    repo: &dyn BillRepository,
    year: i32,
) -> Result<String, RepositoryError> {
    let last = repo.last_sequence(year).await?;
    let next = last
        .checked_add(1)
        .ok_or(RepositoryError::SequenceExhausted(year))?;
    Ok(format_bill_number(year, next))
}

pub(crate) fn apply_patch(bill: &mut Bill, patch: &UpdateBillRequest, now: DateTime<Utc>) {
    if let Some(name) = &patch.farmer_name {
        bill.farmer_name = name.trim().to_string();
    }
    if let Some(op) = &patch.operator_id {
        bill.operator_id = op.trim().to_string();
    }
    if let Some(drone) = &patch.drone_id {
        bill.drone_id = drone.trim().to_string();
    }
    if let Some(acres) = patch.acres {
        bill.acres = acres;
    }
    if let Some(hours) = patch.duration_hours {
        bill.duration_hours = hours;
    }
    if let Some(amount) = patch.amount {
        bill.amount = amount;
    }
    if let Some(mode) = patch.payment_mode {
        bill.payment_mode = mode;
    }
    bill.updated_at = Some(now);
}

/// In-memory filter shared by backends that cannot push it down.
pub(crate) fn matches(bill: &Bill, filter: &BillFilter) -> bool {
    if let Some(op) = &filter.operator_id
        && bill.operator_id != *op
    {
        return false;
    }
    if let Some(drone) = &filter.drone_id
        && bill.drone_id != *drone
    {
        return false;
    }
    if let Some(name) = &filter.farmer_name
        && !bill
            .farmer_name
            .to_lowercase()
            .contains(&name.to_lowercase())
    {
        return false;
    }
    true
}
