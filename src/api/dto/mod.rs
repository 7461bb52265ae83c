/*
 * Responsibility
 * - console form / query の DTO
 * - validate() で形式チェックしてから backend の request 型に変換する
 */
pub mod clients;
pub mod loans;
pub mod reports;
pub mod tariffs;
pub mod tools;

use serde::Deserialize;

/// `?notice=` carried by the redirect that follows a successful mutation.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

fn required(value: &str, field: &'static str) -> Result<String, String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(v.to_string())
}
