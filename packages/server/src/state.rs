use std::sync::Arc;

use common::ai::FieldExtractor;
use common::storage::DocumentStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::repository::BillRepository;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub documents: Arc<dyn DocumentStore>,
    pub extractor: Arc<dyn FieldExtractor>,
    pub bills: Arc<dyn BillRepository>,
}
