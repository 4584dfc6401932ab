// ==========================================
// 集成测试辅助模块
// ==========================================
// dataset_builder: 小型手工数据集（精确断言）
// shared_dataset: 进程内只生成一次的演示数据集（不变量断言）
// ==========================================

#![allow(dead_code)]

pub mod dataset_builder;
pub mod shared_dataset;
