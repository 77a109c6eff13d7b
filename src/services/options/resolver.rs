/*
 * Responsibility
 * - リクエスト単位で名前付き options を 1 度だけ生成してキャッシュする
 * - 同じ名前の同時解決は 1 回の構成実行にまとめる (single-flight)
 *
 * Notes
 * - 失敗した名前はキャッシュしない。次の呼び出しで新しいインスタンスから構成し直す
 */
use std::{
    any::type_name,
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tokio::sync::OnceCell;

use crate::services::options::{DEFAULT_NAME, OptionsError, RequestOptionsFactory};
use crate::services::request::RequestContext;

type Slot<T> = Arc<OnceCell<Arc<T>>>;

/// Request-scoped resolver for one options type.
pub struct RequestOptions<T> {
    factory: Arc<RequestOptionsFactory<T>>,
    cache: Mutex<HashMap<String, Slot<T>>>,
}

impl<T> RequestOptions<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(factory: Arc<RequestOptionsFactory<T>>) -> Self {
        Self {
            factory,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve `name` (or [`DEFAULT_NAME`]) for this request.
    pub async fn get(
        &self,
        name: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<Arc<T>, OptionsError> {
        let name = name.unwrap_or(DEFAULT_NAME);
        let slot = self.slot(name);

        let options = slot
            .get_or_try_init(|| async {
                let options = self.factory.create(name, ctx).await?;
                tracing::debug!(
                    options = type_name::<T>(),
                    name,
                    request_id = ctx.request_id(),
                    "options materialized"
                );
                Ok::<_, OptionsError>(Arc::new(options))
            })
            .await
            .inspect_err(|err| {
                tracing::warn!(
                    options = type_name::<T>(),
                    name,
                    request_id = ctx.request_id(),
                    error = %err,
                    "options configuration failed"
                );
            })?;

        Ok(Arc::clone(options))
    }

    /// Names already materialized in this request.
    pub fn cached_names(&self) -> Vec<String> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = cache
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    fn slot(&self, name: &str) -> Slot<T> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(
            cache
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new())),
        )
    }
}
