#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use reqwest::Url;
use serde_json::json;
use spotti::{
    Res,
    config::{Config, DEFAULT_SCOPE},
    management::{CredentialStore, MemoryStore, Session},
    types::CredentialRecord,
};

pub const ISSUED_ACCESS_TOKEN: &str = "issued-access-token";
pub const ISSUED_REFRESH_TOKEN: &str = "issued-refresh-token";
pub const AUTH_CODE: &str = "test-auth-code";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
}

struct Scripted {
    status: u16,
    body: String,
    headers: Vec<(&'static str, String)>,
}

#[derive(Default)]
struct Inner {
    code_exchanges: AtomicUsize,
    refreshes: AtomicUsize,
    rotate_refresh: AtomicBool,
    token_forms: Mutex<Vec<HashMap<String, String>>>,
    token_failure: Mutex<Option<(u16, String)>>,
    api_requests: Mutex<Vec<RecordedRequest>>,
    scripted: Mutex<VecDeque<Scripted>>,
}

/// Stand-in for Spotify's accounts service and player endpoints.
#[derive(Clone, Default)]
pub struct MockProvider {
    inner: Arc<Inner>,
    pub base: String,
}

impl MockProvider {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let provider = MockProvider {
            inner: Arc::new(Inner::default()),
            base: format!("http://{addr}"),
        };

        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/me/player", get(player))
            .route("/v1/me/player/play", put(player))
            .route("/v1/me/player/pause", put(player))
            .route("/v1/me/player/next", post(player))
            .route("/v1/me/player/previous", post(player))
            .with_state(provider.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        provider
    }

    pub fn config(&self, redirect_port: u16) -> Config {
        Config {
            client_id: "test-client".to_string(),
            redirect_uri: format!("http://127.0.0.1:{redirect_port}/callback"),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: format!("{}/authorize", self.base),
            token_url: format!("{}/api/token", self.base),
            api_url: format!("{}/v1", self.base),
            auth_timeout: Duration::from_secs(5),
        }
    }

    /// Session whose store already holds `stored-access` / `stored-refresh`.
    pub fn authorized_session(&self) -> Session<MemoryStore> {
        let store = MemoryStore::with_record(CredentialRecord {
            token: "stored-access".to_string(),
            refresh_token: "stored-refresh".to_string(),
        });
        Session::new(self.config(free_port()), store).unwrap()
    }

    pub fn script(&self, status: u16, body: &str) {
        self.script_with_headers(status, body, Vec::new());
    }

    pub fn script_with_headers(&self, status: u16, body: &str, headers: Vec<(&'static str, String)>) {
        self.inner.scripted.lock().unwrap().push_back(Scripted {
            status,
            body: body.to_string(),
            headers,
        });
    }

    pub fn fail_token_requests(&self, status: u16, body: &str) {
        *self.inner.token_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn rotate_refresh_tokens(&self) {
        self.inner.rotate_refresh.store(true, Ordering::SeqCst);
    }

    pub fn code_exchanges(&self) -> usize {
        self.inner.code_exchanges.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.inner.refreshes.load(Ordering::SeqCst)
    }

    pub fn token_requests(&self) -> usize {
        self.inner.token_forms.lock().unwrap().len()
    }

    pub fn last_token_form(&self) -> HashMap<String, String> {
        self.inner
            .token_forms
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no token request received")
    }

    pub fn api_requests(&self) -> Vec<RecordedRequest> {
        self.inner.api_requests.lock().unwrap().clone()
    }
}

async fn token(
    State(provider): State<MockProvider>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    provider.inner.token_forms.lock().unwrap().push(form.clone());

    if let Some((status, body)) = provider.inner.token_failure.lock().unwrap().clone() {
        return (StatusCode::from_u16(status).unwrap(), body).into_response();
    }

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") => {
            provider.inner.code_exchanges.fetch_add(1, Ordering::SeqCst);
            Json(json!({
                "access_token": ISSUED_ACCESS_TOKEN,
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": ISSUED_REFRESH_TOKEN,
                "scope": DEFAULT_SCOPE,
            }))
            .into_response()
        }
        Some("refresh_token") => {
            let n = provider.inner.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
            let mut body = json!({
                "access_token": format!("refreshed-access-{n}"),
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": DEFAULT_SCOPE,
            });
            if provider.inner.rotate_refresh.load(Ordering::SeqCst) {
                body["refresh_token"] = json!(format!("rotated-refresh-{n}"));
            }
            Json(body).into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "unsupported_grant_type" })),
        )
            .into_response(),
    }
}

async fn player(
    State(provider): State<MockProvider>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    provider.inner.api_requests.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let Some(scripted) = provider.inner.scripted.lock().unwrap().pop_front() else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let has_body = !scripted.body.is_empty();
    let mut response = (StatusCode::from_u16(scripted.status).unwrap(), scripted.body).into_response();
    if has_body {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }
    for (name, value) in scripted.headers {
        response.headers_mut().insert(
            HeaderName::from_static(name),
            HeaderValue::from_str(&value).unwrap(),
        );
    }
    response
}

/// Keychain that hands out `stored-access` / `stored-refresh` but refuses writes.
pub struct ReadOnlyStore;

impl CredentialStore for ReadOnlyStore {
    fn load(&self) -> Res<Option<CredentialRecord>> {
        Ok(Some(CredentialRecord {
            token: "stored-access".to_string(),
            refresh_token: "stored-refresh".to_string(),
        }))
    }

    fn save(&self, _record: &CredentialRecord) -> Res<()> {
        Err(std::io::Error::other("keychain is locked").into())
    }

    fn clear(&self) -> Res<()> {
        Ok(())
    }
}

pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Plays the user in front of the browser: records the authorization URL and
/// sends the redirect built by `reply` to the listener.
#[derive(Clone, Default)]
pub struct BrowserUser {
    opened: Arc<Mutex<Vec<String>>>,
}

impl BrowserUser {
    pub fn opened(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn last_query(&self) -> HashMap<String, String> {
        let url = self
            .opened
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("browser was never opened");
        Url::parse(&url).unwrap().query_pairs().into_owned().collect()
    }

    pub fn answer_with(
        &self,
        reply: impl Fn(&HashMap<String, String>) -> Option<String> + Send + Sync + 'static,
    ) -> impl Fn(&str) + Send + Sync + 'static {
        let opened = Arc::clone(&self.opened);
        move |auth_url: &str| {
            opened.lock().unwrap().push(auth_url.to_string());
            let query: HashMap<String, String> = Url::parse(auth_url)
                .unwrap()
                .query_pairs()
                .into_owned()
                .collect();
            let Some(redirect_query) = reply(&query) else {
                return;
            };
            let target = format!("{}?{}", query["redirect_uri"], redirect_query);
            tokio::spawn(async move {
                let client = reqwest::Client::builder().no_proxy().build().unwrap();
                let _ = client.get(target).send().await;
            });
        }
    }

    /// A user who grants access.
    pub fn consenting(&self) -> impl Fn(&str) + Send + Sync + 'static {
        self.answer_with(|query| Some(format!("code={AUTH_CODE}&state={}", query["state"])))
    }
}
