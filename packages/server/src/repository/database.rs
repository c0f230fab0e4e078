use async_trait::async_trait;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use uuid::Uuid;

use super::{Bill, BillRepository, RepositoryError, bill_number_prefix, parse_sequence};
use crate::entity::bill;
use crate::models::bill::{BillFilter, UpdateBillRequest};
use crate::models::shared::escape_like;

/// Bills persisted in the `bill` table.
#[derive(Clone)]
pub struct DatabaseBillRepository {
    db: DatabaseConnection,
}

impl DatabaseBillRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BillRepository for DatabaseBillRepository {
    async fn insert(&self, bill: Bill) -> Result<Bill, RepositoryError> {
        let number = bill.bill_number.clone();
        let model = bill::ActiveModel {
            id: Set(bill.id),
            bill_number: Set(bill.bill_number),
            farmer_name: Set(bill.farmer_name),
            operator_id: Set(bill.operator_id),
            drone_id: Set(bill.drone_id),
            acres: Set(bill.acres),
            duration_hours: Set(bill.duration_hours),
            amount: Set(bill.amount),
            payment_mode: Set(bill.payment_mode),
            created_at: Set(bill.created_at),
            updated_at: Set(bill.updated_at),
        };

        model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => RepositoryError::Duplicate(number),
            _ => RepositoryError::Db(e),
        })
    }

    async fn get(&self, id: Uuid) -> Result<Bill, RepositoryError> {
        bill::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn list(&self, filter: &BillFilter) -> Result<Vec<Bill>, RepositoryError> {
        let mut select = bill::Entity::find();

        if let Some(op) = &filter.operator_id {
            select = select.filter(bill::Column::OperatorId.eq(op.as_str()));
        }
        if let Some(drone) = &filter.drone_id {
            select = select.filter(bill::Column::DroneId.eq(drone.as_str()));
        }
        if let Some(name) = &filter.farmer_name {
            let term = escape_like(name);
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(bill::Column::FarmerName)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }

        Ok(select
            .order_by_desc(bill::Column::CreatedAt)
            .order_by_desc(bill::Column::Id)
            .offset(Some(filter.skip))
            .limit(Some(filter.limit))
            .all(&self.db)
            .await?)
    }

    async fn update(&self, id: Uuid, patch: &UpdateBillRequest) -> Result<Bill, RepositoryError> {
        let existing = self.get(id).await?;
        let mut model: bill::ActiveModel = existing.into();

        if let Some(name) = &patch.farmer_name {
            model.farmer_name = Set(name.trim().to_string());
        }
        if let Some(op) = &patch.operator_id {
            model.operator_id = Set(op.trim().to_string());
        }
        if let Some(drone) = &patch.drone_id {
            model.drone_id = Set(drone.trim().to_string());
        }
        if let Some(acres) = patch.acres {
            model.acres = Set(acres);
        }
        if let Some(hours) = patch.duration_hours {
            model.duration_hours = Set(hours);
        }
        if let Some(amount) = patch.amount {
            model.amount = Set(amount);
        }
        if let Some(mode) = patch.payment_mode {
            model.payment_mode = Set(mode);
        }
        model.updated_at = Set(Some(chrono::Utc::now()));

        Ok(model.update(&self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = bill::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(bill::Entity::find().count(&self.db).await?)
    }

    async fn last_sequence(&self, year: i32) -> Result<u32, RepositoryError> {
        let numbers: Vec<String> = bill::Entity::find()
            .select_only()
            .column(bill::Column::BillNumber)
            .filter(bill::Column::BillNumber.starts_with(bill_number_prefix(year)))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(numbers
            .iter()
            .filter_map(|n| parse_sequence(n, year))
            .max()
            .unwrap_or(0))
    }
}
