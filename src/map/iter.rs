use std::fmt;
use std::iter::FusedIterator;
use std::ptr;

use super::skip_map::{SkipMap, NIL};
use crate::compare::NaturalOrder;
use crate::level::GeometricLevelGenerator;

/// 第0层上的游标, 借用跳表, 只能向前移动
///
/// 解引用得到不可变的键值对, 修改值需通过`SkipMap::try_get`.
/// 两个游标指向同一个跳表的同一节点(或都在结尾)时相等.
///
/// # Examples
///
/// ```
/// use skipmap::SkipMap;
/// fn main() {
///     let mut val = SkipMap::new();
///     val.try_emplace(1, 10).unwrap();
///     val.try_emplace(2, 20).unwrap();
///     let mut it = val.lower_bound(&1);
///     assert_eq!(it.get(), Some((&1, &10)));
///     it.advance();
///     assert!(it == val.upper_bound(&1));
///     it.advance();
///     assert!(it == val.end());
///     assert_eq!(it.get(), None);
/// }
/// ```
pub struct Iter<'a, K, V, C = NaturalOrder, G = GeometricLevelGenerator> {
    map: &'a SkipMap<K, V, C, G>,
    cur: usize,
}

impl<'a, K, V, C, G> Iter<'a, K, V, C, G> {
    #[inline]
    pub(crate) fn new(map: &'a SkipMap<K, V, C, G>, cur: usize) -> Self {
        Self { map, cur }
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.cur
    }

    /// 当前位置的键值对, 在结尾时为`None`
    #[inline]
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        self.map
            .node_ref(self.cur)
            .map(|node| (&node.key, &node.value))
    }

    #[inline]
    pub fn key(&self) -> Option<&'a K> {
        self.get().map(|(k, _)| k)
    }

    #[inline]
    pub fn value(&self) -> Option<&'a V> {
        self.get().map(|(_, v)| v)
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.map.node_ref(self.cur).is_none()
    }

    /// 移到第0层的下一个节点, 已在结尾时不动
    #[inline]
    pub fn advance(&mut self) {
        self.cur = self.map.node_ref(self.cur).map_or(NIL, |node| node.forward[0]);
    }
}

impl<'a, K, V, C, G> Clone for Iter<'a, K, V, C, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V, C, G> Copy for Iter<'a, K, V, C, G> {}

impl<'a, K, V, C, G> PartialEq for Iter<'a, K, V, C, G> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.map, other.map) && self.cur == other.cur
    }
}

impl<'a, K, V, C, G> Eq for Iter<'a, K, V, C, G> {}

impl<'a, K: fmt::Debug, V: fmt::Debug, C, G> fmt::Debug for Iter<'a, K, V, C, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.get()).finish()
    }
}

impl<'a, K, V, C, G> Iterator for Iter<'a, K, V, C, G> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.get()?;
        self.advance();
        Some(item)
    }
}

impl<'a, K, V, C, G> FusedIterator for Iter<'a, K, V, C, G> {}

/// 区间`[start, stop)`
pub struct Range<'a, K, V, C = NaturalOrder, G = GeometricLevelGenerator> {
    iter: Iter<'a, K, V, C, G>,
    stop: usize,
}

impl<'a, K, V, C, G> Range<'a, K, V, C, G> {
    pub(crate) fn new(iter: Iter<'a, K, V, C, G>, stop: usize) -> Self {
        Self { iter, stop }
    }
}

impl<'a, K, V, C, G> Clone for Range<'a, K, V, C, G> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter,
            stop: self.stop,
        }
    }
}

impl<'a, K, V, C, G> Iterator for Range<'a, K, V, C, G> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.iter.index() == self.stop {
            return None;
        }
        self.iter.next()
    }
}

impl<'a, K, V, C, G> FusedIterator for Range<'a, K, V, C, G> {}

pub struct Keys<'a, K, V, C = NaturalOrder, G = GeometricLevelGenerator> {
    iter: Iter<'a, K, V, C, G>,
}

impl<'a, K, V, C, G> Keys<'a, K, V, C, G> {
    pub(crate) fn new(iter: Iter<'a, K, V, C, G>) -> Self {
        Self { iter }
    }
}

impl<'a, K, V, C, G> Clone for Keys<'a, K, V, C, G> {
    fn clone(&self) -> Self {
        Self { iter: self.iter }
    }
}

impl<'a, K, V, C, G> Iterator for Keys<'a, K, V, C, G> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, _)| k)
    }
}

impl<'a, K, V, C, G> FusedIterator for Keys<'a, K, V, C, G> {}

pub struct Values<'a, K, V, C = NaturalOrder, G = GeometricLevelGenerator> {
    iter: Iter<'a, K, V, C, G>,
}

impl<'a, K, V, C, G> Values<'a, K, V, C, G> {
    pub(crate) fn new(iter: Iter<'a, K, V, C, G>) -> Self {
        Self { iter }
    }
}

impl<'a, K, V, C, G> Clone for Values<'a, K, V, C, G> {
    fn clone(&self) -> Self {
        Self { iter: self.iter }
    }
}

impl<'a, K, V, C, G> Iterator for Values<'a, K, V, C, G> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, v)| v)
    }
}

impl<'a, K, V, C, G> FusedIterator for Values<'a, K, V, C, G> {}

#[cfg(test)]
mod tests {
    use crate::SkipMap;

    #[test]
    fn test_cursor_eq() {
        let mut a: SkipMap<i32, i32> = SkipMap::new();
        let b: SkipMap<i32, i32> = SkipMap::new();
        assert!(a.iter() == a.end());
        // 不同跳表的结尾不相等
        assert!(a.end() != b.end());

        a.try_emplace(1, 1).unwrap();
        a.try_emplace(2, 2).unwrap();
        assert!(a.lower_bound(&1) == a.iter());
        assert!(a.upper_bound(&1) == a.lower_bound(&2));
        assert!(a.lower_bound(&1) != a.lower_bound(&2));
    }

    #[test]
    fn test_cursor_walk() {
        let s: SkipMap<i32, i32> = (0..5).map(|i| (i, i * i)).collect();
        let mut it = s.lower_bound(&3);
        assert_eq!(it.key(), Some(&3));
        assert_eq!(it.value(), Some(&9));
        let copy = it;
        assert_eq!(it.next(), Some((&3, &9)));
        assert_eq!(it.next(), Some((&4, &16)));
        assert!(it.is_end());
        assert_eq!(it.next(), None);
        it.advance();
        assert!(it == s.end());
        // 复制的游标不受影响
        assert_eq!(copy.get(), Some((&3, &9)));
        assert_eq!(format!("{:?}", copy), "Iter(Some((3, 9)))");
    }

    #[test]
    fn test_keys_values() {
        let s: SkipMap<&str, i32> = vec![("b", 2), ("a", 1), ("c", 3)].into_iter().collect();
        assert_eq!(s.keys().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(s.values().sum::<i32>(), 6);

        let mut keys = s.keys();
        assert_eq!(keys.next(), Some(&"a"));
        let rest = keys.clone();
        assert_eq!(keys.by_ref().count(), 2);
        assert_eq!(keys.next(), None);
        assert_eq!(rest.copied().collect::<Vec<_>>(), vec!["b", "c"]);

        let mut values = s.values().clone();
        assert_eq!(values.by_ref().count(), 3);
        assert_eq!(values.next(), None);
        let mut n = 0;
        for (k, v) in &s {
            assert_eq!(s.get(k), Some(v));
            n += 1;
        }
        assert_eq!(n, 3);
    }
}
