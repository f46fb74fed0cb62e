use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace, warn};

use super::iter::{Iter, Keys, Range, Values};
use crate::compare::{Comparator, NaturalOrder};
use crate::error::Result;
use crate::level::{GeometricLevelGenerator, LevelConfig, LevelGenerator, MAX_LEVEL};

/// 空指针, 表示链表结尾
pub(crate) const NIL: usize = usize::MAX;
/// 头节点, 不在`nodes`中存储
const HEAD: usize = usize::MAX - 1;

#[derive(Debug, Clone)]
pub(crate) struct SkipNode<K, V> {
    pub key: K,
    pub value: V,
    // forward[i] 为第i层的下一个节点, 长度即节点层数, 创建后不变
    pub forward: Vec<usize>,
}

/// 基于跳表的有序映射, 节点存于数组中, 用下标模拟指针
///
/// 节点在被删除前下标不变, 删除后的位置会被后续插入复用
///
/// ```text
/// <head> ----------> [2] --------------------------------------------------> [9] ---------->
/// <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
/// <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
/// <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
/// ```
///
/// # Examples
///
/// ```
/// use skipmap::SkipMap;
/// fn main() {
///     let mut val = SkipMap::new();
///     val.try_emplace(4, "d").unwrap();
///     val.try_emplace(2, "b").unwrap();
///     val.try_emplace(1, "a").unwrap();
///     let mut iter = val.iter();
///     assert_eq!(iter.next(), Some((&1, &"a")));
///     assert_eq!(iter.next(), Some((&2, &"b")));
///     assert_eq!(iter.next(), Some((&4, &"d")));
///     assert_eq!(iter.next(), None);
/// }
/// ```
#[derive(Clone)]
pub struct SkipMap<K, V, C = NaturalOrder, G = GeometricLevelGenerator> {
    nodes: Vec<Option<SkipNode<K, V>>>,
    // 存储空闲位置, 用O(1)的时间复杂度取出空闲位置
    free: Vec<usize>,
    head: [usize; MAX_LEVEL],
    level: usize,
    len: usize,
    compare: C,
    level_generator: G,
}

impl<K: Ord, V> SkipMap<K, V> {
    /// 创建空的跳表, 随机种子取自系统
    pub fn new() -> Self {
        Self::with_config(LevelConfig::default())
    }

    /// 固定随机种子, 相同种子及相同的插入序列得到相同的结构
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    /// fn main() {
    ///     let mut a = SkipMap::with_seed(5);
    ///     let mut b = SkipMap::with_seed(5);
    ///     for i in 0..100 {
    ///         a.try_emplace(i, ()).unwrap();
    ///         b.try_emplace(i, ()).unwrap();
    ///     }
    ///     assert_eq!(a.level(), b.level());
    ///     assert!((0..100).all(|i| a.level_of(&i) == b.level_of(&i)));
    /// }
    /// ```
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(LevelConfig {
            seed: Some(seed),
            ..Default::default()
        })
    }

    pub fn with_config(config: LevelConfig) -> Self {
        Self::with_parts(NaturalOrder, config.build())
    }
}

impl<K, V, C: Comparator<K>> SkipMap<K, V, C> {
    /// 自定义比较函数
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    /// fn main() {
    ///     let mut val = SkipMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    ///     val.try_emplace(1, 1).unwrap();
    ///     val.try_emplace(3, 3).unwrap();
    ///     val.try_emplace(2, 2).unwrap();
    ///     assert_eq!(val.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    /// }
    /// ```
    pub fn with_comparator(compare: C) -> Self {
        Self::with_parts(compare, GeometricLevelGenerator::default())
    }

    pub fn with_config_and_comparator(config: LevelConfig, compare: C) -> Self {
        Self::with_parts(compare, config.build())
    }
}

impl<K, V, C, G> SkipMap<K, V, C, G> {
    /// 指定比较函数及层数生成器
    pub fn with_parts(compare: C, level_generator: G) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: [NIL; MAX_LEVEL],
            level: 1,
            len: 0,
            compare,
            level_generator,
        }
    }

    /// 返回长度
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 当前使用的层数, 空表时为1
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// 清除数据
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    /// fn main() {
    ///     let mut val = SkipMap::new();
    ///     val.try_emplace(1, 1).unwrap();
    ///     assert_eq!(val.len(), 1);
    ///     val.clear();
    ///     assert_eq!(val.len(), 0);
    ///     assert!(val.iter() == val.end());
    /// }
    /// ```
    pub fn clear(&mut self) {
        debug!("skip map clear {} entries", self.len);
        self.nodes.clear();
        self.free.clear();
        self.head = [NIL; MAX_LEVEL];
        self.level = 1;
        self.len = 0;
    }

    #[inline]
    pub(crate) fn node_ref(&self, idx: usize) -> Option<&SkipNode<K, V>> {
        self.nodes.get(idx).and_then(|node| node.as_ref())
    }

    #[inline]
    fn node_mut(&mut self, idx: usize) -> Option<&mut SkipNode<K, V>> {
        self.nodes.get_mut(idx).and_then(|node| node.as_mut())
    }

    #[inline]
    fn forward(&self, idx: usize, level: usize) -> usize {
        if idx == HEAD {
            self.head[level]
        } else {
            self.node_ref(idx).map_or(NIL, |node| node.forward[level])
        }
    }

    #[inline]
    fn set_forward(&mut self, idx: usize, level: usize, next: usize) {
        if idx == HEAD {
            self.head[level] = next;
        } else if let Some(node) = self.node_mut(idx) {
            node.forward[level] = next;
        }
    }

    /// 迭代器, 按键的升序遍历
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    /// fn main() {
    ///     let mut val = SkipMap::new();
    ///     val.try_emplace(3, 30).unwrap();
    ///     val.try_emplace(1, 10).unwrap();
    ///     val.try_emplace(2, 20).unwrap();
    ///     assert_eq!(val.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![10, 20, 30]);
    /// }
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V, C, G> {
        Iter::new(self, self.head[0])
    }

    /// 结尾位置, 所有游标走完后都等于它
    #[inline]
    pub fn end(&self) -> Iter<'_, K, V, C, G> {
        Iter::new(self, NIL)
    }

    pub fn keys(&self) -> Keys<'_, K, V, C, G> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V, C, G> {
        Values::new(self.iter())
    }

    /// 最小的键值对
    pub fn first(&self) -> Option<(&K, &V)> {
        self.node_ref(self.head[0]).map(|node| (&node.key, &node.value))
    }

    /// 最大的键值对, 沿高层快速走到结尾
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    /// fn main() {
    ///     let mut val = SkipMap::new();
    ///     assert_eq!(val.last(), None);
    ///     for i in 0..50 {
    ///         val.try_emplace(i, i * 2).unwrap();
    ///     }
    ///     assert_eq!(val.first(), Some((&0, &0)));
    ///     assert_eq!(val.last(), Some((&49, &98)));
    /// }
    /// ```
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            loop {
                let next = self.forward(x, i);
                if next == NIL {
                    break;
                }
                x = next;
            }
        }
        self.node_ref(x).map(|node| (&node.key, &node.value))
    }
}

impl<K, V, C: Comparator<K>, G: LevelGenerator> SkipMap<K, V, C, G> {
    /// 从最高层往下查找, 记录每层最后一个小于`key`的节点,
    /// 返回第一个大于等于`key`的节点
    fn search(&self, key: &K, update: &mut [usize; MAX_LEVEL]) -> usize {
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            loop {
                let next = self.forward(x, i);
                match self.node_ref(next) {
                    Some(node) if self.compare.compare(&node.key, key) == Ordering::Less => {
                        x = next
                    }
                    _ => break,
                }
            }
            update[i] = x;
        }
        self.forward(x, 0)
    }

    #[inline]
    fn find_ge(&self, key: &K) -> usize {
        let mut update = [HEAD; MAX_LEVEL];
        self.search(key, &mut update)
    }

    #[inline]
    fn is_key(&self, idx: usize, key: &K) -> bool {
        self.node_ref(idx)
            .map_or(false, |node| self.compare.compare(&node.key, key) == Ordering::Equal)
    }

    fn find_eq(&self, key: &K) -> Option<usize> {
        let idx = self.find_ge(key);
        if self.is_key(idx, key) {
            Some(idx)
        } else {
            None
        }
    }

    /// 包含键值
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    /// fn main() {
    ///     let mut val = SkipMap::new();
    ///     assert!(!val.contains(&1));
    ///     val.try_emplace(1, 1).unwrap();
    ///     assert!(val.contains(&1));
    ///     assert!(!val.contains(&2));
    /// }
    /// ```
    pub fn contains(&self, key: &K) -> bool {
        self.find_eq(key).is_some()
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let idx = self.find_eq(key)?;
        self.node_ref(idx).map(|node| (&node.key, &node.value))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// 获取键值对, 值可修改, 键不可修改以免破坏顺序
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    /// fn main() {
    ///     let mut val = SkipMap::new();
    ///     assert!(val.try_get(&1).is_none());
    ///     val.try_emplace(1, 1).unwrap();
    ///     if let Some((_, v)) = val.try_get(&1) {
    ///         *v += 1;
    ///     }
    ///     assert_eq!(val.try_get(&1).map(|(_, v)| *v), Some(2));
    /// }
    /// ```
    pub fn try_get(&mut self, key: &K) -> Option<(&K, &mut V)> {
        let idx = self.find_eq(key)?;
        self.node_mut(idx).map(|node| (&node.key, &mut node.value))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.try_get(key).map(|(_, v)| v)
    }

    /// 节点占据的层数
    pub fn level_of(&self, key: &K) -> Option<usize> {
        let idx = self.find_eq(key)?;
        self.node_ref(idx).map(|node| node.forward.len())
    }

    fn make_node(&mut self, key: K, value: V, level: usize) -> Result<usize> {
        let mut forward = Vec::new();
        forward.try_reserve_exact(level)?;
        forward.resize(level, NIL);
        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => {
                self.nodes.try_reserve(1)?;
                self.nodes.push(None);
                self.nodes.len() - 1
            }
        };
        self.nodes[idx] = Some(SkipNode {
            key,
            value,
            forward,
        });
        Ok(idx)
    }

    /// 键不存在时插入, 返回`true`; 已存在时不做任何修改, 返回`false`
    ///
    /// 内存申请在修改链接前完成, 失败时结构不变
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    /// fn main() {
    ///     let mut val = SkipMap::new();
    ///     assert_eq!(val.try_emplace(1, "a").unwrap(), true);
    ///     assert_eq!(val.try_emplace(1, "b").unwrap(), false);
    ///     assert_eq!(val.get(&1), Some(&"a"));
    ///     assert_eq!(val.len(), 1);
    /// }
    /// ```
    pub fn try_emplace(&mut self, key: K, value: V) -> Result<bool> {
        let mut update = [HEAD; MAX_LEVEL];
        let x = self.search(&key, &mut update);
        if self.is_key(x, &key) {
            return Ok(false);
        }

        let total = self.level_generator.total().clamp(1, MAX_LEVEL);
        let level = self.level_generator.random().clamp(1, total);
        let x = self.make_node(key, value, level).inspect_err(|err| {
            warn!("skip map insert failed at len {}: {}", self.len, err);
        })?;

        if level > self.level {
            trace!("skip map level grow {} -> {}", self.level, level);
            // 新增的层前驱都是头节点, update 初始值已是 HEAD
            self.level = level;
        }

        for i in 0..level {
            let next = self.forward(update[i], i);
            self.set_forward(x, i, next);
            self.set_forward(update[i], i, x);
        }
        self.len += 1;
        Ok(true)
    }

    /// 删除键并返回值, 其它节点的位置不受影响
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    /// fn main() {
    ///     let mut val = SkipMap::new();
    ///     val.try_emplace(1, "a").unwrap();
    ///     val.try_emplace(2, "b").unwrap();
    ///     assert_eq!(val.remove(&1), Some("a"));
    ///     assert_eq!(val.remove(&1), None);
    ///     assert_eq!(val.len(), 1);
    ///     assert!(!val.contains(&1));
    /// }
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut update = [HEAD; MAX_LEVEL];
        let x = self.search(key, &mut update);
        if !self.is_key(x, key) {
            return None;
        }

        let node = self.nodes.get_mut(x)?.take()?;
        for (i, next) in node.forward.iter().enumerate() {
            if self.forward(update[i], i) == x {
                self.set_forward(update[i], i, *next);
            }
        }
        self.free.push(x);
        self.len -= 1;

        while self.level > 1 && self.head[self.level - 1] == NIL {
            self.level -= 1;
            trace!("skip map level shrink to {}", self.level);
        }
        Some(node.value)
    }

    /// 第一个大于等于`key`的位置, 不存在时为`end()`
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    /// fn main() {
    ///     let mut val = SkipMap::new();
    ///     for i in (1..100).filter(|i| i % 2 == 1) {
    ///         val.try_emplace(i, i).unwrap();
    ///     }
    ///     assert_eq!(val.lower_bound(&0).get(), Some((&1, &1)));
    ///     assert_eq!(val.lower_bound(&2).get(), Some((&3, &3)));
    ///     assert_eq!(val.lower_bound(&99).get(), Some((&99, &99)));
    ///     assert!(val.lower_bound(&100) == val.end());
    /// }
    /// ```
    pub fn lower_bound(&self, key: &K) -> Iter<'_, K, V, C, G> {
        Iter::new(self, self.find_ge(key))
    }

    /// 第一个大于`key`的位置, 不存在时为`end()`
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    /// fn main() {
    ///     let mut val = SkipMap::new();
    ///     for i in (1..100).filter(|i| i % 2 == 1) {
    ///         val.try_emplace(i, i).unwrap();
    ///     }
    ///     assert_eq!(val.upper_bound(&0).get(), Some((&1, &1)));
    ///     assert_eq!(val.upper_bound(&1).get(), Some((&3, &3)));
    ///     assert!(val.upper_bound(&99) == val.end());
    /// }
    /// ```
    pub fn upper_bound(&self, key: &K) -> Iter<'_, K, V, C, G> {
        let idx = self.find_ge(key);
        if self.is_key(idx, key) {
            Iter::new(self, self.forward(idx, 0))
        } else {
            Iter::new(self, idx)
        }
    }

    /// 遍历区间`[start, end)`内的键值对, `start`不小于`end`时为空
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    /// fn main() {
    ///     let val: SkipMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
    ///     assert_eq!(val.range(&3, &6).map(|(k, _)| *k).collect::<Vec<_>>(), vec![3, 4, 5]);
    ///     assert_eq!(val.range(&6, &3).count(), 0);
    /// }
    /// ```
    pub fn range(&self, start: &K, end: &K) -> Range<'_, K, V, C, G> {
        if self.compare.compare(start, end) != Ordering::Less {
            return Range::new(self.end(), NIL);
        }
        let stop = self.lower_bound(end).index();
        Range::new(self.lower_bound(start), stop)
    }
}

impl<K: Ord, V> Default for SkipMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C, G> fmt::Debug for SkipMap<K, V, C, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, C, G> IntoIterator for &'a SkipMap<K, V, C, G> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C, G>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 与重复调用`try_emplace`一致, 相同的键保留第一次出现的值
///
/// # Panics
///
/// 申请内存失败时panic, 与标准库集合一致
impl<K, V, C: Comparator<K>, G: LevelGenerator> Extend<(K, V)> for SkipMap<K, V, C, G> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            if let Err(err) = self.try_emplace(k, v) {
                panic!("{}", err);
            }
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = SkipMap::new();
        map.extend(iter);
        map
    }
}
