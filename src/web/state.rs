use std::sync::Arc;

use super::store::PointStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PointStore>,
}
