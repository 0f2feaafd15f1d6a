#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{
    config::RuntimeConfiguration,
    error::{BindListenerSnafu, HubResult, ServeSnafu},
    routes::{
        add_student::{internal_get_add_student_form, internal_put_new_student},
        all_students::{internal_get_directory_results, internal_post_directory_page},
        import_export::get_students_csv,
        index::{
            get_index_route, internal_get_main, internal_get_nav, internal_post_dismiss_notice,
            internal_post_tab,
        },
        sse::sse_feed,
        student_in_detail::{
            internal_get_edit_form, internal_get_student, internal_post_request_delete,
            internal_post_resolve_delete, internal_put_student,
        },
    },
    state::HubState,
};
use axum::{
    Router,
    routing::{get, post},
};
use snafu::ResultExt;
use tokio::{net::TcpListener, signal};
use tower_http::{
    compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod config;
mod dashboard;
mod data;
mod directory;
mod error;
mod loader;
mod maud_conveniences;
mod routes;
mod state;

const MAX_BODY_BYTES: usize = 64 * 1024;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
}

pub fn router(state: HubState) -> Router {
    Router::new()
        .route("/", get(get_index_route))
        .route("/students/export.csv", get(get_students_csv))
        .route("/internal/main", get(internal_get_main))
        .route("/internal/nav", get(internal_get_nav))
        .route("/internal/tab", post(internal_post_tab))
        .route("/internal/notice/dismiss", post(internal_post_dismiss_notice))
        .route(
            "/internal/directory/results",
            get(internal_get_directory_results),
        )
        .route("/internal/directory/page", post(internal_post_directory_page))
        .route(
            "/internal/add_student",
            get(internal_get_add_student_form).put(internal_put_new_student),
        )
        .route(
            "/internal/students/{id}",
            get(internal_get_student).put(internal_put_student),
        )
        .route("/internal/students/{id}/edit", get(internal_get_edit_form))
        .route(
            "/internal/students/{id}/delete",
            post(internal_post_request_delete),
        )
        .route("/internal/pending_delete", post(internal_post_resolve_delete))
        .route("/sse_feed", get(sse_feed))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn run(config: RuntimeConfiguration) -> HubResult<()> {
    let state = HubState::new(config.clone())?;

    //the page shows a spinner until this finishes
    tokio::spawn({
        let state = state.clone();
        async move { state.load_students().await }
    });

    let addr = config.server_addr();
    let listener = TcpListener::bind(addr)
        .await
        .context(BindListenerSnafu { addr })?;

    info!(?addr, "Listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(ServeSnafu)
}

#[tokio::main]
async fn main() {
    //a missing .env is fine, everything has a default
    let _ = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");

    let config = match RuntimeConfiguration::new() {
        Ok(config) => config,
        Err(e) => {
            error!(?e, "Unable to read configuration");
            std::process::exit(1);
        }
    };
    info!(
        server_addr = ?config.server_addr(),
        source_url = %config.source_config().url,
        fallback_count = config.source_config().fallback_count,
        page_size = config.page_size(),
        "Loaded configuration"
    );

    if let Err(e) = run(config).await {
        error!(?e, "Fatal error");
        std::process::exit(1);
    }
}
