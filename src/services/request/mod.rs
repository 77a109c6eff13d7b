/*
 * Responsibility
 * - 1 リクエストの寿命を表すコンテキスト (request id / method / uri / headers)
 * - request scope (options キャッシュ) の所有者
 * - middleware が生成して extensions に入れ、リクエスト終了で破棄される
 */
mod scope;

use std::{fmt, sync::Arc};

use axum::http::{HeaderMap, Method, Uri, request::Parts};

use crate::services::options::{OptionsError, OptionsRegistry};

pub use scope::RequestScope;

struct Inner {
    request_id: String,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    registry: Arc<OptionsRegistry>,
    scope: RequestScope,
}

/// Handle to the request currently being served. Clones share the request.
#[derive(Clone)]
pub struct RequestContext {
    inner: Arc<Inner>,
}

impl RequestContext {
    pub fn new(
        request_id: impl Into<String>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        registry: Arc<OptionsRegistry>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                request_id: request_id.into(),
                method,
                uri,
                headers,
                registry,
                scope: RequestScope::new(),
            }),
        }
    }

    pub fn from_parts(
        parts: &Parts,
        request_id: impl Into<String>,
        registry: Arc<OptionsRegistry>,
    ) -> Self {
        Self::new(
            request_id,
            parts.method.clone(),
            parts.uri.clone(),
            parts.headers.clone(),
            registry,
        )
    }

    pub fn request_id(&self) -> &str {
        &self.inner.request_id
    }

    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    pub fn uri(&self) -> &Uri {
        &self.inner.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn scope(&self) -> &RequestScope {
        &self.inner.scope
    }

    /// End the request scope when the returned guard is dropped.
    ///
    /// ```ignore
    /// let ctx = RequestContext::new(...);
    /// let _scope = ctx.enter();
    /// let options = ctx.get_options::<MyOptions>(None).await?;
    /// ```
    pub fn enter(&self) -> ScopeGuard {
        ScopeGuard { ctx: self.clone() }
    }

    /// Resolve the `name`d options of type `T` for this request.
    ///
    /// `None` resolves the default name. Repeated calls within the same
    /// request return the same `Arc`.
    pub async fn get_options<T>(&self, name: Option<&str>) -> Result<Arc<T>, OptionsError>
    where
        T: Send + Sync + 'static,
    {
        let resolver = self.inner.scope.resolver::<T>(&self.inner.registry)?;
        resolver.get(name, self).await
    }
}

/// Clears the request scope on drop, including when the request future is
/// cancelled (timeout, client disconnect).
#[must_use = "the scope is cleared as soon as the guard is dropped"]
pub struct ScopeGuard {
    ctx: RequestContext,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        tracing::debug!(
            request_id = self.ctx.request_id(),
            resolvers = self.ctx.scope().resolver_count(),
            "request scope closed"
        );
        self.ctx.scope().clear();
    }
}

impl PartialEq for RequestContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for RequestContext {}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.inner.request_id)
            .field("method", &self.inner.method)
            .field("uri", &self.inner.uri)
            .finish_non_exhaustive()
    }
}
