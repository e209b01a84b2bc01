pub mod assets;
pub mod history;

/// Server clock for the `info.time` field, in Unix seconds.
pub(crate) fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

pub async fn health() -> &'static str {
    "ok"
}
