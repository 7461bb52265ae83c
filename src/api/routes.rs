/*
 * Responsibility
 * - console の URL 構造を定義
 * - public / any authenticated / staff (ADMIN or USER) / ADMIN の group ごとに gate を route_layer で掛ける
 * - 未知の route は fallback (UNKNOWN_ROUTE_POLICY)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::guards;
use crate::api::handlers::{auth, clients, fallback, home, kardex, loans, reports, tariffs, tools};
use crate::middleware::auth::gate;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(home::landing))
        .route("/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/logout", post(auth::logout));

    let authenticated = Router::new()
        .route("/profile", get(home::profile))
        .route("/tools", get(tools::list));

    let staff = Router::new()
        .route("/loans", get(loans::list))
        .route("/loans/add", get(loans::add_form).post(loans::create))
        .route(
            "/loans/return/{id}",
            get(loans::return_form).post(loans::return_loan),
        )
        .route("/loans/{id}/pay", post(loans::pay))
        .route("/clients", get(clients::list))
        .route("/clients/{id}/pay-dues", post(clients::pay_dues))
        .route("/reports", get(reports::view))
        .route("/kardex", get(kardex::list));

    let admin = Router::new()
        .route("/tools/add", get(tools::add_form).post(tools::create))
        .route("/tools/{id}/decommission", post(tools::decommission))
        .route("/tools/{id}/stock", post(tools::adjust_stock))
        .route("/clients/add", get(clients::add_form).post(clients::create))
        .route(
            "/clients/edit/{id}",
            get(clients::edit_form).post(clients::update),
        )
        .route("/clients/{id}/status", post(clients::set_status))
        .route("/tariffs", get(tariffs::list))
        .route(
            "/tariffs/edit/{id}",
            get(tariffs::edit_form).post(tariffs::update),
        );

    public
        .merge(gate::apply(authenticated, &state, guards::any_authenticated()))
        .merge(gate::apply(staff, &state, guards::staff()))
        .merge(gate::apply(admin, &state, guards::admin()))
        .fallback(fallback::unknown_route)
}
