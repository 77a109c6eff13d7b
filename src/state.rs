/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - options registry (起動時に 1 度だけ組み立てる)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::options::OptionsRegistry;

#[derive(Clone, Debug)]
pub struct AppState {
    pub options: Arc<OptionsRegistry>,
}

impl AppState {
    pub fn new(options: Arc<OptionsRegistry>) -> Self {
        Self { options }
    }
}
