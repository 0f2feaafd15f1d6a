use crate::{
    data::student::Student,
    error::{BadSourceStatusSnafu, DecodeStudentsSnafu, FetchStudentsSnafu, HubError, HubResult},
    loader::remote::{RemoteUser, RemoteUserList},
};
use snafu::{ResultExt, ensure};

pub mod remote;
pub mod synthetic;

///The result of the one attempt to load students. The caller decides what to do on failure -
///nothing here substitutes sample data.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Vec<Student>),
    Failed(HubError),
}

async fn fetch(client: &reqwest::Client, url: &str) -> HubResult<Vec<Student>> {
    let response = client
        .get(url)
        .send()
        .await
        .context(FetchStudentsSnafu { url })?;

    let status = response.status();
    ensure!(
        status.is_success(),
        BadSourceStatusSnafu {
            url,
            status: status.as_u16()
        }
    );

    let body = response
        .bytes()
        .await
        .context(FetchStudentsSnafu { url })?;
    let list: RemoteUserList = serde_json::from_slice(&body).context(DecodeStudentsSnafu)?;

    Ok(list
        .users
        .into_iter()
        .filter_map(RemoteUser::into_student)
        .collect())
}

///Makes exactly one GET request to `url`. No retries.
pub async fn load(client: &reqwest::Client, url: &str) -> LoadOutcome {
    info!(%url, "Fetching students");

    match fetch(client, url).await {
        Ok(students) => {
            info!(count = students.len(), "Loaded students from source");
            LoadOutcome::Loaded(students)
        }
        Err(e) => {
            warn!(?e, %url, "Failed to load students");
            LoadOutcome::Failed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};
    use tokio::net::TcpListener;

    async fn serve_upstream(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/users")
    }

    #[tokio::test]
    async fn test_loads_and_maps_users() {
        let url = serve_upstream(Router::new().route(
            "/users",
            get(|| async {
                r#"{"users":[
                    {"id":4,"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com","role":"moderator"},
                    {"id":9,"firstName":"Alan","lastName":"Turing","email":"alan@example.com"}
                ]}"#
            }),
        ))
        .await;

        let LoadOutcome::Loaded(students) = load(&reqwest::Client::new(), &url).await else {
            panic!("expected students to load");
        };
        let codes: Vec<String> = students.iter().map(|s| s.code.to_string()).collect();
        assert_eq!(codes, vec!["STU000004", "STU000009"]);
        assert_eq!(students[0].first_name, "Ada");
    }

    #[tokio::test]
    async fn test_non_success_status_fails() {
        let url = serve_upstream(Router::new().route(
            "/users",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }),
        ))
        .await;

        let outcome = load(&reqwest::Client::new(), &url).await;
        assert!(matches!(
            outcome,
            LoadOutcome::Failed(HubError::BadSourceStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_fails() {
        let url = serve_upstream(Router::new().route("/users", get(|| async { "not json" }))).await;

        let outcome = load(&reqwest::Client::new(), &url).await;
        assert!(matches!(
            outcome,
            LoadOutcome::Failed(HubError::DecodeStudents { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_source_fails() {
        //bind then drop so nothing is listening on the port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = load(&reqwest::Client::new(), &format!("http://{addr}/users")).await;
        assert!(matches!(
            outcome,
            LoadOutcome::Failed(HubError::FetchStudents { .. })
        ));
    }
}
