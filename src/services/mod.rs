//! Resource service layer
//! 每个资源一个模块，函数与后端 REST 端点一一对应

pub mod articles;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod favorites;
pub mod stats;

pub use articles::ArticleService;
pub use auth::AuthService;
pub use categories::CategoryService;
pub use comments::CommentService;
pub use favorites::FavoriteService;
pub use stats::StatsService;
