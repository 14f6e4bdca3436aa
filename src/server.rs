use crate::data::{SolveReport, TimetableInput};
use crate::search::SolverConfig;
use crate::solver;
use axum::{Json, Router, http::StatusCode, routing::post};
use log::info;
use serde::Deserialize;
use std::net::SocketAddr;

/// A timetable together with optional solver settings under `options`.
#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    #[serde(flatten)]
    pub timetable: TimetableInput,
    #[serde(default)]
    pub options: SolverConfig,
}

async fn solve_handler(
    Json(request): Json<SolveRequest>,
) -> Result<Json<SolveReport>, (StatusCode, String)> {
    // The search is CPU bound and may run for a while.
    let result =
        tokio::task::spawn_blocking(move || solver::solve(&request.timetable, &request.options))
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    match result {
        Ok(report) => Ok(Json(report)),
        Err(e) => Err((StatusCode::BAD_REQUEST, e.to_string())),
    }
}

pub fn router() -> Router {
    Router::new().route("/v1/timetable/solve", post(solve_handler))
}

pub async fn run_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);
    axum::serve(listener, router()).await
}
