use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::entity::bill::PaymentMode;
use crate::repository::{Bill, BillRepository, RepositoryError};

/// Demo bills shown on a fresh dashboard:
/// (number, farmer, operator, drone, acres, hours, amount, payment mode, age in days).
const DEMO_BILLS: &[(&str, &str, &str, &str, f64, f64, f64, PaymentMode, i64)] = &[
    ("BILL-2024-001", "Rajesh Kumar", "operator-001", "drone-01", 5.0, 2.5, 1250.0, PaymentMode::Cash, 4),
    ("BILL-2024-002", "Suresh Patel", "operator-001", "drone-01", 8.0, 4.0, 2000.0, PaymentMode::Upi, 3),
    ("BILL-2024-003", "Amit Singh", "operator-002", "drone-02", 3.0, 1.5, 750.0, PaymentMode::Cash, 2),
    ("BILL-2024-004", "Priya Sharma", "operator-001", "drone-01", 10.0, 5.0, 2500.0, PaymentMode::Upi, 1),
    ("BILL-2024-005", "Vijay Reddy", "operator-002", "drone-02", 6.0, 3.0, 1500.0, PaymentMode::Cash, 0),
];

/// Insert the demo bills if the repository is empty. Returns how many were added.
pub async fn seed_demo_bills(repo: &dyn BillRepository) -> Result<usize, RepositoryError> {
    if repo.count().await? > 0 {
        return Ok(0);
    }

    let now = Utc::now();
    for &(number, farmer, operator, drone, acres, hours, amount, payment_mode, age_days) in DEMO_BILLS {
        repo.insert(Bill {
            id: Uuid::now_v7(),
            bill_number: number.to_string(),
            farmer_name: farmer.to_string(),
            operator_id: operator.to_string(),
            drone_id: drone.to_string(),
            acres,
            duration_hours: hours,
            amount,
            payment_mode,
            created_at: now - Duration::days(age_days),
            updated_at: None,
        })
        .await?;
    }

    info!("Seeded {} demo bills", DEMO_BILLS.len());
    Ok(DEMO_BILLS.len())
}
