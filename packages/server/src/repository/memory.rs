use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{Bill, BillRepository, RepositoryError, apply_patch, matches, parse_sequence};
use crate::models::bill::{BillFilter, UpdateBillRequest};

/// Process-local bill store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryBillRepository {
    bills: DashMap<Uuid, Bill>,
    /// bill_number -> id, guards uniqueness.
    numbers: DashMap<String, Uuid>,
}

impl InMemoryBillRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BillRepository for InMemoryBillRepository {
    async fn insert(&self, bill: Bill) -> Result<Bill, RepositoryError> {
        match self.numbers.entry(bill.bill_number.clone()) {
            Entry::Occupied(_) => return Err(RepositoryError::Duplicate(bill.bill_number)),
            Entry::Vacant(slot) => {
                slot.insert(bill.id);
            }
        }
        self.bills.insert(bill.id, bill.clone());
        Ok(bill)
    }

    async fn get(&self, id: Uuid) -> Result<Bill, RepositoryError> {
        self.bills
            .get(&id)
            .map(|b| b.clone())
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn list(&self, filter: &BillFilter) -> Result<Vec<Bill>, RepositoryError> {
        let mut bills: Vec<Bill> = self
            .bills
            .iter()
            .filter(|b| matches(b.value(), filter))
            .map(|b| b.value().clone())
            .collect();
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(bills
            .into_iter()
            .skip(filter.skip as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn update(&self, id: Uuid, patch: &UpdateBillRequest) -> Result<Bill, RepositoryError> {
        let mut bill = self
            .bills
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound(id))?;
        apply_patch(&mut bill, patch, chrono::Utc::now());
        Ok(bill.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let (_, bill) = self
            .bills
            .remove(&id)
            .ok_or(RepositoryError::NotFound(id))?;
        self.numbers.remove(&bill.bill_number);
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.bills.len() as u64)
    }

    async fn last_sequence(&self, year: i32) -> Result<u32, RepositoryError> {
        Ok(self
            .numbers
            .iter()
            .filter_map(|e| parse_sequence(e.key(), year))
            .max()
            .unwrap_or(0))
    }
}
