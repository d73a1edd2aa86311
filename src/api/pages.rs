use axum::response::Html;

const HOME_HTML: &str = include_str!("../../templates/home.html");

/// `GET /` — the page embedding the ChatKit widget.
pub async fn home() -> Html<&'static str> {
    Html(HOME_HTML)
}

pub async fn healthz() -> &'static str {
    "ok"
}
