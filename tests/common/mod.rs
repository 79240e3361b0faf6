//! 测试公共模块
//! 提供进程内模拟后端与客户端构造辅助

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use blog_client::config::ApiConfig;
use blog_client::http::ApiClient;
use blog_client::session::SessionStore;
use blog_client::storage::MemoryStorage;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 测试后端接受的密码
pub const VALID_PASSWORD: &str = "secret123";

/// 模拟后端的可观测状态与行为开关
pub struct BackendState {
    hits: Mutex<HashMap<String, usize>>,
    /// 最近一次列表请求携带的查询参数
    pub last_list_query: Mutex<Option<HashMap<String, String>>>,
    /// 列表端点的默认响应
    pub list_response: Mutex<Value>,
    /// 按页覆盖的列表响应
    pub responses_by_page: Mutex<HashMap<u32, Value>>,
    /// 按页注入的响应延迟（毫秒），用于构造过期响应
    pub delays_by_page: Mutex<HashMap<u32, u64>>,
    /// 收藏状态（切换端点在 true/false 间翻转）
    pub favorites: Mutex<HashMap<i64, bool>>,
    /// 受保护端点一律返回 401
    pub force_unauthorized: AtomicBool,
    /// 登出端点返回 500
    pub fail_logout: AtomicBool,
    /// 创建文章返回 400 字段错误
    pub fail_create: AtomicBool,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            hits: Mutex::new(HashMap::new()),
            last_list_query: Mutex::new(None),
            list_response: Mutex::new(json!({"results": [], "count": 0})),
            responses_by_page: Mutex::new(HashMap::new()),
            delays_by_page: Mutex::new(HashMap::new()),
            favorites: Mutex::new(HashMap::new()),
            force_unauthorized: AtomicBool::new(false),
            fail_logout: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
        }
    }
}

impl BackendState {
    fn record(&self, key: &str) {
        *self.hits.lock().unwrap().entry(key.to_string()).or_insert(0) += 1;
    }

    /// 某端点被命中的次数
    pub fn hits(&self, key: &str) -> usize {
        self.hits.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

/// 运行中的模拟后端
pub struct TestBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

/// 启动模拟后端，监听随机端口
pub async fn spawn_backend() -> TestBackend {
    let state = Arc::new(BackendState::default());
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBackend {
        base_url: format!("http://{}/api", addr),
        state,
    }
}

/// 构造指向测试后端的客户端（内存凭证存储）
pub fn make_client(base_url: &str) -> (Arc<ApiClient>, SessionStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let session = SessionStore::new(storage.clone());
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        page_size: 9,
    };
    let client = Arc::new(ApiClient::new(&config, session.clone()).unwrap());
    (client, session, storage)
}

/// 标准用户 JSON
pub fn user_value(username: &str) -> Value {
    json!({
        "id": 1,
        "username": username,
        "email": format!("{}@example.com", username),
        "bio": "hello",
        "articles_count": 3,
        "comments_count": 5,
        "likes_count": 2
    })
}

/// 标准文章 JSON
pub fn article_value(id: i64) -> Value {
    json!({
        "id": id,
        "title": format!("Article {}", id),
        "content": "Lorem ipsum dolor sit amet, consectetur adipiscing elit",
        "author": "alice",
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-01T10:00:00Z",
        "view_count": 10,
        "comments_count": 2,
        "like_count": 1,
        "is_favorite": false
    })
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Invalid or expired token"})),
    )
}

fn router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/api/token/", post(issue_token))
        .route("/api/token/refresh/", post(refresh_token))
        .route("/api/auth/profile/", get(get_profile).put(update_profile))
        .route("/api/auth/register/", post(register))
        .route("/api/auth/logout/", post(logout))
        .route("/api/auth/favorites/", get(list_favorites))
        .route("/api/auth/stats/", get(user_stats))
        .route("/api/articles/", get(list_articles).post(create_article))
        .route("/api/articles/my", get(my_articles))
        .route("/api/articles/search/", get(search_articles))
        .route(
            "/api/articles/{id}/",
            get(article_detail).put(update_article).delete(delete_article),
        )
        .route(
            "/api/articles/{id}/favorite/",
            post(toggle_favorite).delete(remove_favorite),
        )
        .route(
            "/api/articles/{id}/comments/",
            get(list_comments).post(add_comment),
        )
        .route(
            "/api/articles/{id}/comments/{cid}/",
            axum::routing::put(update_comment).delete(delete_comment),
        )
        .route("/api/categories/", get(list_categories))
        .route("/api/categories/{id}/articles/", get(category_articles))
        .route("/api/stats/blog/", get(blog_stats))
        .with_state(state)
}

async fn issue_token(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("token");
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();

    if password == VALID_PASSWORD && !username.is_empty() {
        (
            StatusCode::OK,
            Json(json!({
                "access": format!("access-{}", username),
                "refresh": format!("refresh-{}", username)
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
    }
}

async fn refresh_token(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("refresh");
    let refresh = body["refresh"].as_str().unwrap_or_default();
    if refresh.starts_with("refresh-") {
        (StatusCode::OK, Json(json!({"access": "access-refreshed"})))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired"})),
        )
    }
}

async fn get_profile(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.record("profile");
    match bearer(&headers).and_then(|t| t.strip_prefix("access-").map(str::to_string)) {
        Some(username) if !username.is_empty() => (StatusCode::OK, Json(user_value(&username))),
        _ => unauthorized(),
    }
}

async fn update_profile(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("profile_update");
    let Some(username) =
        bearer(&headers).and_then(|t| t.strip_prefix("access-").map(str::to_string))
    else {
        return unauthorized();
    };

    let mut user = user_value(&username);
    if let (Some(user_obj), Some(body_obj)) = (user.as_object_mut(), body.as_object()) {
        for (key, value) in body_obj {
            user_obj.insert(key.clone(), value.clone());
        }
    }
    (StatusCode::OK, Json(user))
}

async fn register(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("register");
    let username = body["username"].as_str().unwrap_or("newuser");
    let mut user = user_value(username);
    user["id"] = json!(2);
    (StatusCode::CREATED, Json(user))
}

async fn logout(State(state): State<Arc<BackendState>>) -> (StatusCode, Json<Value>) {
    state.record("logout");
    if state.fail_logout.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "logout failed"})),
        );
    }
    (StatusCode::OK, Json(json!({"message": "已成功登出"})))
}

async fn list_articles(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.record("list");
    *state.last_list_query.lock().unwrap() = Some(params.clone());

    if state.force_unauthorized.load(Ordering::SeqCst) {
        return unauthorized();
    }

    let page: u32 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);

    // 在 await 之前取出延迟与响应，锁不能跨 await 持有
    let delay = state.delays_by_page.lock().unwrap().get(&page).copied();
    if let Some(ms) = delay {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    let response = state
        .responses_by_page
        .lock()
        .unwrap()
        .get(&page)
        .cloned()
        .unwrap_or_else(|| state.list_response.lock().unwrap().clone());
    (StatusCode::OK, Json(response))
}

async fn create_article(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("create");
    if state.fail_create.load(Ordering::SeqCst) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"title": ["This field may not be blank."]})),
        );
    }

    let mut article = article_value(100);
    if let (Some(article_obj), Some(body_obj)) = (article.as_object_mut(), body.as_object()) {
        for (key, value) in body_obj {
            article_obj.insert(key.clone(), value.clone());
        }
    }
    (StatusCode::CREATED, Json(article))
}

async fn my_articles(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.record("my_articles");
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!([article_value(1)])))
}

async fn search_articles(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.record("search");
    *state.last_list_query.lock().unwrap() = Some(params);
    (StatusCode::OK, Json(json!([article_value(1)])))
}

async fn article_detail(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    state.record("detail");
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})));
    }

    let mut article = article_value(id);
    article["comments"] = json!([
        {"id": 1, "content": "first", "author": "bob", "created_at": "2024-03-02T08:00:00Z"},
        {"id": 2, "content": "second", "author": "carol", "created_at": "2024-03-02T09:00:00Z"}
    ]);
    (StatusCode::OK, Json(article))
}

async fn update_article(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("update");
    let mut article = article_value(id);
    if let (Some(article_obj), Some(body_obj)) = (article.as_object_mut(), body.as_object()) {
        for (key, value) in body_obj {
            article_obj.insert(key.clone(), value.clone());
        }
    }
    (StatusCode::OK, Json(article))
}

async fn delete_article(
    State(state): State<Arc<BackendState>>,
    Path(_id): Path<i64>,
) -> StatusCode {
    state.record("delete");
    StatusCode::NO_CONTENT
}

async fn toggle_favorite(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.record("favorite");
    if bearer(&headers).is_none() {
        return unauthorized();
    }

    let mut favorites = state.favorites.lock().unwrap();
    let flag = favorites.entry(id).or_insert(false);
    *flag = !*flag;
    let is_favorite = *flag;
    drop(favorites);

    (StatusCode::OK, Json(json!({"is_favorite": is_favorite})))
}

async fn remove_favorite(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
) -> StatusCode {
    state.record("favorite_remove");
    state.favorites.lock().unwrap().insert(id, false);
    StatusCode::NO_CONTENT
}

async fn list_favorites(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.record("favorites_list");
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!([article_value(1)])))
}

async fn list_comments(
    State(state): State<Arc<BackendState>>,
    Path(_id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    state.record("comments_list");
    (
        StatusCode::OK,
        Json(json!([
            {"id": 1, "content": "first", "author": "bob", "created_at": "2024-03-02T08:00:00Z"}
        ])),
    )
}

async fn add_comment(
    State(state): State<Arc<BackendState>>,
    Path(_id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("comment_add");
    (
        StatusCode::CREATED,
        Json(json!({
            "id": 9,
            "content": body["content"],
            "author": "alice",
            "created_at": "2024-03-02T10:00:00Z"
        })),
    )
}

async fn update_comment(
    State(state): State<Arc<BackendState>>,
    Path((_id, cid)): Path<(i64, i64)>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("comment_update");
    (
        StatusCode::OK,
        Json(json!({
            "id": cid,
            "content": body["content"],
            "author": "alice",
            "created_at": "2024-03-02T10:00:00Z"
        })),
    )
}

async fn delete_comment(
    State(state): State<Arc<BackendState>>,
    Path((_id, _cid)): Path<(i64, i64)>,
) -> StatusCode {
    state.record("comment_delete");
    StatusCode::NO_CONTENT
}

async fn list_categories(State(state): State<Arc<BackendState>>) -> (StatusCode, Json<Value>) {
    state.record("categories");
    (
        StatusCode::OK,
        Json(json!([
            {"id": 1, "name": "rust", "slug": "rust"},
            {"id": 2, "name": "web", "slug": "web"}
        ])),
    )
}

async fn category_articles(
    State(state): State<Arc<BackendState>>,
    Path(_id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    state.record("category_articles");
    (StatusCode::OK, Json(json!([article_value(1)])))
}

async fn blog_stats(State(state): State<Arc<BackendState>>) -> (StatusCode, Json<Value>) {
    state.record("blog_stats");
    (
        StatusCode::OK,
        Json(json!({
            "total_articles": 12,
            "total_comments": 30,
            "total_users": 5
        })),
    )
}

async fn user_stats(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.record("user_stats");
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({"articles_count": 3, "comments_count": 5, "favorites_count": 1})),
    )
}
