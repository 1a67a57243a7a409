// 服务模块

pub mod storage;
