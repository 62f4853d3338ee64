use actix_web::http::header;
use actix_web::{get, head, web, HttpResponse};
use chrono::Local;

use crate::error::{DashboardError, DashboardResult};
use crate::state::AppState;
use crate::view::{self, compute, Controls, DashboardView, FilterState, ViewQuery};

const INDEX: &str = include_str!("../assets/index.html");
const CHART_SIZE: (u32, u32) = (900, 500);

fn filter_state(
    state: &AppState,
    query: &ViewQuery,
) -> DashboardResult<(std::sync::Arc<cord19::Dataset>, FilterState)> {
    let base = state.dataset()?;
    let base_controls = Controls::from_dataset(&base)?;
    let filters = FilterState::from_query(query, &base_controls)?;
    Ok((base, filters))
}

fn dashboard_view(
    state: &AppState,
    query: &ViewQuery,
) -> DashboardResult<DashboardView> {
    let (base, filters) = filter_state(state, query)?;
    Ok(compute(&base, &filters)?)
}

#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX)
}

#[get("/api/controls")]
async fn controls(state: web::Data<AppState>) -> DashboardResult<HttpResponse> {
    let base = state.dataset()?;
    Ok(HttpResponse::Ok().json(Controls::from_dataset(&base)?))
}

#[get("/api/stats")]
async fn stats(state: web::Data<AppState>) -> DashboardResult<HttpResponse> {
    let stats = state.stats()?;
    Ok(HttpResponse::Ok().json(&*stats))
}

#[get("/api/view")]
async fn dashboard(
    state: web::Data<AppState>,
    query: web::Query<ViewQuery>,
) -> DashboardResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(dashboard_view(&state, &query)?))
}

#[get("/api/charts/{name}")]
async fn chart(
    state: web::Data<AppState>,
    name: web::Path<String>,
    query: web::Query<ViewQuery>,
) -> DashboardResult<HttpResponse> {
    let name = name.into_inner();
    if !view::CHARTS.contains(&name.as_str()) {
        return Ok(HttpResponse::NotFound().body(format!("unknown chart `{name}`")));
    }

    let view = dashboard_view(&state, &query)?;
    let Some(chart) = view::chart(&view, &name) else {
        return Err(DashboardError::BadRequest(format!("unknown chart `{name}`")));
    };

    let svg = chart.render_svg(CHART_SIZE)?;
    Ok(HttpResponse::Ok().content_type("image/svg+xml").body(svg))
}

#[get("/api/export.csv")]
async fn export(
    state: web::Data<AppState>,
    query: web::Query<ViewQuery>,
) -> DashboardResult<HttpResponse> {
    let (base, filters) = filter_state(&state, &query)?;
    let browsed = view::browse(&base.filter(&filters.filter()), &filters);

    let mut body = vec![];
    browsed.write_columns(&filters.columns, &mut body)?;

    let filename = format!("cord19_filtered_{}.csv", Local::now().format("%Y%m%d"));
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body))
}

#[head("/health-check")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(controls)
        .service(stats)
        .service(dashboard)
        .service(chart)
        .service(export)
        .service(health_check);
}

#[cfg(test)]
mod tests {
    use actix_web::http::{Method, StatusCode};
    use actix_web::{test, App};
    use cord19::{generate, SampleSpec};

    use super::*;

    type TestResult = anyhow::Result<()>;

    fn app_state(dir: &std::path::Path, records: usize) -> anyhow::Result<AppState> {
        let data = dir.join("cord19_sample.csv");
        generate(&SampleSpec::demo()?, records, 11)?.to_path(&data)?;
        Ok(AppState::new(data, dir.join("app_stats.json")))
    }

    #[actix_web::test]
    async fn health_check_and_index() -> TestResult {
        let dir = tempfile::tempdir()?;
        let state = web::Data::new(app_state(dir.path(), 10)?);
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::with_uri("/health-check")
            .method(Method::HEAD)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert!(String::from_utf8(body.to_vec())?.contains("CORD-19"));
        Ok(())
    }

    #[actix_web::test]
    async fn view_and_export() -> TestResult {
        let dir = tempfile::tempdir()?;
        let state = web::Data::new(app_state(dir.path(), 60)?);
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/view?journals=").to_request();
        let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["overview"]["total_papers"], 60);
        assert_eq!(view["overview"]["delta"], 0);
        assert_eq!(view["browser"]["records"], 60);

        let req = test::TestRequest::get()
            .uri("/api/view?sources=&journals=")
            .to_request();
        let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["overview"]["total_papers"], 0);
        assert_eq!(view["overview"]["delta"], -60);

        let req = test::TestRequest::get()
            .uri("/api/export.csv?journals=&columns=title,journal")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("cord19_filtered_"));

        let body = String::from_utf8(test::read_body(resp).await.to_vec())?;
        assert!(body.starts_with("title,journal\n"));
        assert_eq!(body.lines().count(), 61);
        Ok(())
    }

    #[actix_web::test]
    async fn bad_requests() -> TestResult {
        let dir = tempfile::tempdir()?;
        let state = web::Data::new(app_state(dir.path(), 10)?);
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/charts/radar").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/view?columns=nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[actix_web::test]
    async fn missing_data() -> TestResult {
        let dir = tempfile::tempdir()?;
        let state = web::Data::new(AppState::new(
            dir.path().join("missing.csv"),
            dir.path().join("stats.json"),
        ));
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/stats").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        Ok(())
    }
}
