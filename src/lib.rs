//! 博客客户端库
//! 面向博客 REST 后端的无界面客户端：会话生命周期、HTTP 封装、
//! 资源服务与列表/表单状态机

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod validation;
pub mod views;
