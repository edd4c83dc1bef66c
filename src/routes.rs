use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

// 引入自定义中间件模块，重命名为 app_middleware 以避免与 axum::middleware 命名冲突。
use crate::{handlers, middleware as app_middleware, state::AppState};

/// 创建应用程序路由器。
///
/// # 路由结构
/// 1. `GET /` - 欢迎语。
/// 2. 认证路由 (`/api/v1/auth/*`) - 注册、登录公开；`/me` 需要令牌。
/// 3. 商品路由 (`/api/v1/products/*`) - 查询公开；新建、修改、删除需要管理员。
/// 4. 其余路径 - 404 兜底。
///
/// # 中间件（从外到内）
/// 来源守卫 → CORS 响应头 → 请求日志 → 路由。
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me));

    // 写操作挂管理员守卫；route_layer 只作用于已匹配的路由，读操作不受影响
    let admin_guard =
        middleware::from_fn_with_state(state.clone(), app_middleware::auth::admin_guard);

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list)
                .merge(post(handlers::products::create).route_layer(admin_guard.clone())),
        )
        .route(
            "/{id}",
            get(handlers::products::get_one).merge(
                put(handlers::products::update)
                    .merge(delete(handlers::products::delete))
                    .route_layer(admin_guard),
            ),
        );

    Router::new()
        .route("/", get(handlers::system::welcome))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/products", product_routes)
        .fallback(handlers::system::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(app_middleware::cors::cors_layer())
        .layer(middleware::from_fn(app_middleware::cors::origin_guard))
        .with_state(state)
}
