// 数据模型模块

pub mod settings;

pub use settings::{AppSettings, ConnectionSettings};
