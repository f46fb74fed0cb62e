//! 基于跳表的有序映射
//!
//! 节点保存在数组中并以下标互相链接, 支持`contains`/`try_get`/`try_emplace`
//! 以及`lower_bound`/`upper_bound`区间查询, 按键升序遍历.
//! 单线程结构, 需要并发访问时由调用方加锁.

mod compare;
mod error;
mod level;
mod map;

pub use compare::{Comparator, NaturalOrder};
pub use error::{Result, SkipError};
pub use level::{GeometricLevelGenerator, LevelConfig, LevelGenerator, MAX_LEVEL, PERCENT};
pub use map::{Iter, Keys, Range, SkipMap, Values};
