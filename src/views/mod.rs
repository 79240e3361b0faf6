//! Headless view-state controllers
//! 列表与表单的状态机，不含任何渲染

pub mod article_form;
pub mod article_list;

pub use article_form::ArticleForm;
pub use article_list::{ArticleListQuery, ArticleListState, ArticleListView, SortOrder};
