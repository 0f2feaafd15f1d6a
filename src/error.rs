use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;
use std::{net::AddrParseError, num::ParseIntError};

pub type HubResult<T> = Result<T, HubError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HubError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse `{}` from env var `{}` as a number", original, name))]
    ParseNumber {
        source: ParseIntError,
        original: String,
        name: &'static str,
    },
    #[snafu(display("`{}` must be at least 1", name))]
    ZeroNotAllowed { name: &'static str },
    #[snafu(display("Unable to parse server address {:?}", original))]
    ParseServerAddr {
        source: AddrParseError,
        original: String,
    },
    #[snafu(display("Error building HTTP client"))]
    BuildClient { source: reqwest::Error },
    #[snafu(display("Error fetching students from {}", url))]
    FetchStudents { source: reqwest::Error, url: String },
    #[snafu(display("Student source {} responded with status {}", url, status))]
    BadSourceStatus { url: String, status: u16 },
    #[snafu(display("Unable to decode student list"))]
    DecodeStudents { source: serde_json::Error },
    #[snafu(display("Unable to parse student code {:?}", original))]
    InvalidStudentCode { original: String },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: u64 },
    #[snafu(display("Student data is still loading"))]
    StillLoading,
    #[snafu(display("Student {} is not waiting for delete confirmation", id))]
    DeleteNotPending { id: u64 },
    #[snafu(display("Unable to listen on {}", addr))]
    BindListener {
        source: std::io::Error,
        addr: std::net::SocketAddr,
    },
    #[snafu(display("Error serving app"))]
    Serve { source: std::io::Error },
    #[snafu(display("Error writing CSV"))]
    Csv { source: csv::Error },
    #[snafu(display("Error finishing CSV"))]
    FinishCsv { source: std::io::Error },
}

impl IntoResponse for HubError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input
        const SU: StatusCode = StatusCode::SERVICE_UNAVAILABLE; //still loading
        const CF: StatusCode = StatusCode::CONFLICT; //stale confirmation

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"StudentHub Error: "}
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::BadEnvVar { .. } | Self::ParseNumber { .. } | Self::ZeroNotAllowed { .. } => ISE,
            Self::ParseServerAddr { .. } => ISE,
            Self::BuildClient { .. } => ISE,
            Self::FetchStudents { .. } | Self::BadSourceStatus { .. } => ISE,
            Self::DecodeStudents { .. } => ISE,
            Self::InvalidStudentCode { .. } => BI,
            Self::MissingStudent { .. } => NF,
            Self::StillLoading => SU,
            Self::DeleteNotPending { .. } => CF,
            Self::BindListener { .. } | Self::Serve { .. } => ISE,
            Self::Csv { .. } | Self::FinishCsv { .. } => ISE,
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(self.to_string()).into_string())).into_response()
    }
}
