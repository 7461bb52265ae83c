/*
 * Responsibility
 * - middleware の公開インターフェース
 * - http: transport 層 (request-id / trace / limit / timeout)
 * - auth: route group ごとの session/role gate
 * - same_origin: cross-site からの state-changing request を拒否
 */
pub mod auth;
pub mod http;
pub mod same_origin;
