use std::{path::PathBuf, sync::Arc};

use axum::{
    http::{header, HeaderValue, Response, StatusCode},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use collection::store::FileStore;
use session::{server::SessionHandle, Session};

mod cards;
mod collection;
mod draw;
mod handlers;
mod session;

pub type Res<T> = Result<T, String>;

pub fn err<T, S: ToString>(message: S) -> Res<T> {
    Err(message.to_string())
}

#[derive(serde::Serialize)]
struct Resp {
    message: String,
    success: bool,
}

impl Resp {
    fn respond(body: String, status: StatusCode) -> Response<String> {
        let mut resp = Response::new(body);
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        resp
    }

    fn axum<S: ToString>(message: S, status: StatusCode) -> Response<String> {
        match serde_json::ser::to_string(&Self {
            message: message.to_string(),
            success: status == StatusCode::OK,
        }) {
            Ok(body) => Self::respond(body, status),
            Err(e) => Self::e500_plain(e),
        }
    }

    fn e500_plain<E: std::fmt::Display>(e: E) -> Response<String> {
        let mut resp = Response::new(format!("Failed to JSON encode response: {e}"));
        *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        resp
    }

    fn json<T: serde::Serialize>(value: &T) -> Response<String> {
        match serde_json::ser::to_string(value) {
            Ok(body) => Self::respond(body, StatusCode::OK),
            Err(e) => Self::e500_plain(e),
        }
    }

    fn e404<S: ToString>(message: S) -> Response<String> {
        Self::axum(message, StatusCode::NOT_FOUND)
    }

    fn e500<S: ToString>(message: S) -> Response<String> {
        Self::axum(message, StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn router(session: SessionHandle, content: PathBuf) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(content).append_index_html_on_directories(true))
        .route("/api/rarities", get(handlers::rarities))
        .route("/api/packs", get(handlers::list_packs))
        .route("/api/packs/:id/odds", get(handlers::pack_odds))
        .route("/api/packs/:id/open", post(handlers::open_pack))
        .route("/api/collection", get(handlers::collection))
        .route("/api/cards/:id", get(handlers::card_detail))
        .with_state(session)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() {
    const USAGE: &str = "Usage: server <static path> <catalog path> <data path> <port>";

    let content = std::env::args().nth(1).expect(USAGE);
    let catalog = std::env::args().nth(2).expect(USAGE);
    let data = std::env::args().nth(3).expect(USAGE);
    let port = std::env::args()
        .nth(4)
        .map(|s| {
            s.parse::<u16>()
                .unwrap_or_else(|_| panic!("Invalid port number: {s}"))
        })
        .expect(USAGE);

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let catalog = match cards::catalog::load_catalog(&PathBuf::from(catalog)).await {
        Ok(catalog) => catalog,
        Err(e) => panic!("Failed to load catalog: {e}"),
    };
    let store = match FileStore::new(&data) {
        Ok(store) => store,
        Err(e) => panic!("Failed to open data directory {data}: {e}"),
    };

    let session = SessionHandle::spawn(Session::new(Arc::new(catalog), Box::new(store)));
    let app = router(session, PathBuf::from(content));

    let listener = TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .unwrap_or_else(|e| panic!("Failed to open port {port}: {e}"));
    tracing::info!("Listening on port {port}.");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Closed due to error: {e}");
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use rand::{rngs::StdRng, SeedableRng};
    use reqwest::StatusCode;
    use tokio::net::TcpListener;

    use super::router;
    use crate::{
        collection::store::MemoryStore,
        session::{server::SessionHandle, test::sample_catalog, Session},
    };

    /// Serve the API on a free local port, returning its base URL.
    async fn serve() -> String {
        let session = SessionHandle::spawn(Session::with_rng(
            Arc::new(sample_catalog()),
            Box::new(MemoryStore::default()),
            StdRng::seed_from_u64(9),
        ));
        let app = router(session, std::env::temp_dir());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.ok() });
        format!("http://{addr}")
    }

    async fn call(
        client: &reqwest::Client,
        method: reqwest::Method,
        url: String,
    ) -> (StatusCode, serde_json::Value) {
        let resp = client.request(method, url).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_open_pack_route() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let (status, body) = call(
            &client,
            reqwest::Method::POST,
            format!("{base}/api/packs/main/open"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["saved"], true);
        assert_eq!(body["results"].as_array().unwrap().len(), 10);
        assert!(body["results"][0]["isFirstTime"].as_bool().unwrap());

        let (status, body) = call(
            &client,
            reqwest::Method::GET,
            format!("{base}/api/collection"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["totalCards"], 10);

        let (status, body) = call(
            &client,
            reqwest::Method::POST,
            format!("{base}/api/packs/nope/open"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_read_routes() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let (status, body) = call(&client, reqwest::Method::GET, format!("{base}/api/packs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["id"], "main");

        let (status, body) = call(
            &client,
            reqwest::Method::GET,
            format!("{base}/api/packs/main/odds"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rarities"].as_array().unwrap().len(), 3);
        assert_eq!(body["legendary"].as_array().unwrap().len(), 1);

        let (status, body) = call(
            &client,
            reqwest::Method::GET,
            format!("{base}/api/rarities"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[6]["label"], "LR");

        let (status, _) = call(
            &client,
            reqwest::Method::GET,
            format!("{base}/api/cards/{}", u32::MAX),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
