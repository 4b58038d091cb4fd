use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// 统计量的聚合形态
///
/// Histogram 支持分布聚合（分位数、min/max/mean），
/// Counter 只支持求和；下游聚合按此区分处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatKind {
    Histogram,
    Counter,
}

/// 声明的聚合意图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Intent {
    Time,
    Count,
}

/// 统计量描述
///
/// 在进程启动时显式构造一次，以 Arc 共享给执行器和收集器；
/// 不存在隐式全局注册表。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub name: &'static str,
    pub kind: StatKind,
    pub intent: Intent,
}

impl Stat {
    pub const fn new(name: &'static str, kind: StatKind, intent: Intent) -> Self {
        Self { name, kind, intent }
    }
}

/// 样本标签，无序的字符串键值映射，供下游分组
pub type Tags = HashMap<String, String>;

/// 样本值集合
pub type Values = HashMap<String, f64>;

/// 单值样本的简写
pub fn value(v: f64) -> Values {
    HashMap::from([("value".to_string(), v)])
}

/// 一次测量产生的样本
///
/// 只写一次：追加进收集器后不再修改或移除。
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    #[serde(serialize_with = "serialize_stat")]
    pub stat: Arc<Stat>,
    pub tags: Tags,
    pub values: Values,
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    pub fn new(stat: Arc<Stat>, tags: Tags, values: Values) -> Self {
        Self {
            stat,
            tags,
            values,
            timestamp: Utc::now(),
        }
    }
}

fn serialize_stat<S>(stat: &Arc<Stat>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    stat.as_ref().serialize(serializer)
}
