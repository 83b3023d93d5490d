//! 应用配置模块
//!
//! 配置来源优先级：环境变量 > config.{APP_ENV} > config 默认文件。

mod r#impl;
mod structs;

pub use structs::*;
