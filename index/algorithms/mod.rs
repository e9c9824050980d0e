// 索引算法模块
//
// - distance: 大圆距离（Haversine，英里）
// - nearest: 基于坐标排序的双向扩展最近邻查询

pub mod distance;
pub mod nearest;
