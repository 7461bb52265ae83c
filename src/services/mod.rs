/*
 * Responsibility
 * - auth: session, role gate, outbound request pipeline
 * - identity: Keycloak login / refresh / logout
 * - backend: ToolRent REST client
 */
pub mod auth;
pub mod backend;
pub mod identity;
