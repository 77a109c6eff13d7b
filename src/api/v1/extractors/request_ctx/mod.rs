/*!
 * Request context extractor
 *
 * Responsibility:
 * - request_scope middleware が extensions に入れた RequestContext を handler に渡す
 *
 * Public API:
 * - RequestCtx
 */

mod core;

pub use core::RequestCtx;
