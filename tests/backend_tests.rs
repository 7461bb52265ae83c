mod common;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{Harness, client_json, tool_json};
use toolrent_console::services::backend::{
    ClientStatus, LoanReportStatus, LoanStatus, NewTool, ReturnLoan, ToolStatus,
};

#[tokio::test]
async fn stock_adjustment_sends_signed_delta() {
    let h = Harness::start().await;
    h.login_as("ana", &["ADMIN"], 300);

    Mock::given(method("PATCH"))
        .and(path("/tools/7/stock"))
        .and(body_json(json!({ "delta": -2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_json(7, "Saw", "AVAILABLE")))
        .expect(1)
        .mount(&h.backend)
        .await;

    let tool = h.state.api.adjust_stock(7, -2).await.unwrap();
    assert_eq!(tool.status, ToolStatus::Available);
}

#[tokio::test]
async fn create_tool_posts_camel_case_body() {
    let h = Harness::start().await;
    h.login_as("ana", &["ADMIN"], 300);

    Mock::given(method("POST"))
        .and(path("/tools"))
        .and(body_json(json!({
            "name": "Drill",
            "category": "Power",
            "stock": 3,
            "replacementValue": 45000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_json(1, "Drill", "AVAILABLE")))
        .expect(1)
        .mount(&h.backend)
        .await;

    let tool = NewTool {
        name: "Drill".into(),
        category: "Power".into(),
        stock: 3,
        replacement_value: 45000,
    };
    assert_eq!(h.state.api.create_tool(&tool).await.unwrap().id, 1);
}

#[tokio::test]
async fn return_and_pay_follow_the_loan_contract() {
    let h = Harness::start().await;
    h.login_as("ana", &["USER"], 300);

    Mock::given(method("PUT"))
        .and(path("/loans/4/return"))
        .and(body_json(json!({
            "returnDate": "2025-03-10",
            "damaged": true,
            "irreparable": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "status": "CLOSED", "totalPenalty": 6000.0
        })))
        .expect(1)
        .mount(&h.backend)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/loans/4/pay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(client_json(2, "Luis", "ACTIVE")))
        .expect(1)
        .mount(&h.backend)
        .await;

    let ret = ReturnLoan {
        return_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        damaged: true,
        irreparable: false,
    };
    let loan = h.state.api.return_loan(4, &ret).await.unwrap();
    assert_eq!(loan.status, LoanStatus::Closed);
    assert!(loan.has_unpaid_penalty());

    let client = h.state.api.pay_loan(4).await.unwrap();
    assert_eq!(client.status, ClientStatus::Active);
}

#[tokio::test]
async fn client_status_change_sends_status_name() {
    let h = Harness::start().await;
    h.login_as("ana", &["ADMIN"], 300);

    Mock::given(method("PATCH"))
        .and(path("/clients/2/status"))
        .and(body_json(json!({ "status": "RESTRICTED" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(client_json(2, "Luis", "RESTRICTED")),
        )
        .expect(1)
        .mount(&h.backend)
        .await;

    let client = h
        .state
        .api
        .set_client_status(2, ClientStatus::Restricted)
        .await
        .unwrap();
    assert_eq!(client.status, ClientStatus::Restricted);
}

#[tokio::test]
async fn reports_pass_filters_as_query_parameters() {
    let h = Harness::start().await;
    h.login_as("ana", &["USER"], 300);

    Mock::given(method("GET"))
        .and(path("/reports/loans"))
        .and(query_param("status", "LATE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 9, "status": "LATE", "dueDate": "2025-02-01" }
        ])))
        .expect(1)
        .mount(&h.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/reports/tools/top"))
        .and(query_param("from", "2025-01-01"))
        .and(query_param("to", "2025-01-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [tool_json(1, "Drill", "LOANED"), 7]
        ])))
        .expect(1)
        .mount(&h.backend)
        .await;

    let late = h
        .state
        .api
        .loans_by_status(LoanReportStatus::Late)
        .await
        .unwrap();
    assert_eq!(late[0].id, 9);

    let top = h
        .state
        .api
        .top_tools(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(top[0].0.name, "Drill");
    assert_eq!(top[0].1, 7);
}

#[tokio::test]
async fn kardex_can_be_filtered_by_tool() {
    let h = Harness::start().await;
    h.login_as("ana", &["ADMIN"], 300);

    Mock::given(method("GET"))
        .and(path("/kardex/tool/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 11,
            "tool": tool_json(3, "Ladder", "AVAILABLE"),
            "type": "INCOME",
            "date": "2025-03-01T09:30:00",
            "quantity": 5,
            "user": { "username": "ana" }
        }])))
        .expect(1)
        .mount(&h.backend)
        .await;

    let movements = h.state.api.list_tool_movements(3).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].kind.as_str(), "INCOME");
    assert_eq!(movements[0].quantity, Some(5));
}

#[tokio::test]
async fn plain_text_server_errors_are_kept() {
    let h = Harness::start().await;
    h.login_as("ana", &["ADMIN"], 300);

    Mock::given(method("PUT"))
        .and(path("/tools/5/decommission"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string("Error interno: IllegalStateException - Tool is currently loaned"),
        )
        .expect(1)
        .mount(&h.backend)
        .await;

    let err = h.state.api.decommission_tool(5).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(
        err.to_string(),
        "Error interno: IllegalStateException - Tool is currently loaned"
    );
}
