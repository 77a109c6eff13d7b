/*
 * Responsibility
 * - middleware の公開インターフェース
 * - http (request id / trace / timeout), request_scope, auth
 */
pub mod auth;
pub mod http;
pub mod request_scope;
