use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{OriginalUri, Path, Query, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const MAX_PAGE: u32 = 100;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub likes_count: u64,
}

/// Error payload in the service's `{"message", "type"}` shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// What the server saw for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub raw_query: Option<String>,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
    pub content_type: Option<String>,
}

pub type Users = HashMap<String, Vec<Item>>;

#[derive(Clone, Default)]
pub struct MockState {
    users: Arc<Users>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    latency: Option<Duration>,
}

impl MockState {
    pub fn new(users: Users) -> Self {
        Self {
            users: Arc::new(users),
            ..Self::default()
        }
    }

    /// `yaotti` with five items and `empty` with none.
    pub fn fixture() -> Self {
        let mut users = Users::new();
        users.insert("yaotti".to_string(), fixture_items());
        users.insert("empty".to_string(), Vec::new());
        Self::new(users)
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }
}

pub fn fixture_items() -> Vec<Item> {
    [
        ("f6c78c01ee8c988a9f7a", "RDSで`Mysql2::Error: Incorrect key file for table '/rdsdbdata/tmp/...'; try to repair it`というエラーに対応する", 9),
        ("157ff0a46736ec793a91", "ディレクトリ移動を手軽にするauto cdとcdpath", 73),
        ("5b70c9f9d882f6f10023", "ある程度Gitを操作できるようになってから当たると良いマニュアル/情報源", 302),
        ("2f5ee4a7d4e94b1a8c1e", "Rustで書く小さなHTTPクライアント", 12),
        ("9a0c1d3e5f7b2c4d6e8f", "tokioのCancellationTokenを使う", 0),
    ]
    .into_iter()
    .map(|(id, title, likes_count)| Item {
        id: id.to_string(),
        title: title.to_string(),
        likes_count,
    })
    .collect()
}

pub fn app() -> Router {
    router(MockState::fixture())
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/users/{user_id}/items", get(user_items))
        .with_state(state)
}

/// Serve the API under a path prefix such as `/api/v2`.
pub fn router_under(prefix: &str, state: MockState) -> Router {
    Router::new().nest(prefix, router(state))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, MockState::fixture()).await
}

/// Serve `state` at the root. Keep a clone of `state` to read recorded
/// requests afterwards.
pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    serve(listener, router(state)).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

async fn user_items(
    State(state): State<MockState>,
    Path(user_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    RawQuery(raw_query): RawQuery,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Item>>> {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.write().await.push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        raw_query: raw_query.clone(),
        authorization: header_value(header::AUTHORIZATION),
        user_agent: header_value(header::USER_AGENT),
        content_type: header_value(header::CONTENT_TYPE),
    });
    tracing::debug!(%user_id, ?raw_query, "user items request");

    if let Some(latency) = state.latency {
        tokio::time::sleep(latency).await;
    }

    let items = state.users.get(&user_id).ok_or_else(|| {
        error(StatusCode::NOT_FOUND, "Not found", "not_found")
    })?;
    let (page, per_page) = parse_paging(&params)
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Bad request", "bad_request"))?;

    Ok(Json(page_of(items, page, per_page)))
}

/// Both parameters are required and must lie in `1..=MAX_PAGE` and
/// `1..=MAX_PER_PAGE`.
fn parse_paging(params: &HashMap<String, String>) -> Option<(u32, u32)> {
    let page: u32 = params.get("page")?.parse().ok()?;
    let per_page: u32 = params.get("per_page")?.parse().ok()?;
    if !(1..=MAX_PAGE).contains(&page) || !(1..=MAX_PER_PAGE).contains(&per_page) {
        return None;
    }
    Some((page, per_page))
}

fn page_of(items: &[Item], page: u32, per_page: u32) -> Vec<Item> {
    let start = (page as usize - 1) * per_page as usize;
    items.iter().skip(start).take(per_page as usize).cloned().collect()
}

fn error(status: StatusCode, message: &str, kind: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
            kind: kind.to_string(),
        }),
    )
}
