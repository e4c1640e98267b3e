/*
 * Responsibility
 * - middleware の公開インターフェース
 *   - auth: route 単位の guard (token / role / username / role_name)
 *   - http: 全 route 共通の transport 層 (request id / trace / body limit / timeout)
 */
pub mod auth;
pub mod http;
