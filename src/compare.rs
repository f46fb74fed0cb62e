use std::cmp::Ordering;

/// 键的比较方式, 必须满足严格全序
///
/// 比较函数需要满足:
/// - 结果稳定: `compare(a, b)` 每次调用返回相同结果
/// - 反对称: `compare(a, b) == Less` 当且仅当 `compare(b, a) == Greater`
/// - 传递性: `compare(a, b) == Less` 且 `compare(b, c) == Less` 则 `compare(a, c) == Less`
///
/// 不满足时查找结果不确定, 但不会产生内存错误
pub trait Comparator<K> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// 使用键自身的 `Ord` 实现
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord> Comparator<K> for NaturalOrder {
    #[inline(always)]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline(always)]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
