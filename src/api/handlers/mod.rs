/*
 * Responsibility
 * - console の page / form handler
 * - backend 呼び出しは state.api 経由のみ (auth pipeline を必ず通す)
 * - mutation 成功 → 一覧へ redirect (再取得), 失敗 → 同じ画面に message をそのまま表示
 */
pub mod auth;
pub mod clients;
pub mod fallback;
pub mod home;
pub mod kardex;
pub mod loans;
pub mod reports;
pub mod tariffs;
pub mod tools;

use axum::response::Redirect;

/// 303 to `path`, carrying a one-line notice for the next page.
pub(crate) fn redirect_with_notice(path: &str, notice: &str) -> Redirect {
    let encoded: String = url::form_urlencoded::byte_serialize(notice.as_bytes()).collect();
    Redirect::to(&format!("{path}?notice={encoded}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn notice_is_query_encoded() {
        let res = redirect_with_notice("/tools", "Tool created: Drill & Bit").into_response();
        assert_eq!(
            res.headers()["location"],
            "/tools?notice=Tool+created%3A+Drill+%26+Bit"
        );
    }
}
