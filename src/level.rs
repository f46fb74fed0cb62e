use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 跳表允许的最大层数
pub const MAX_LEVEL: usize = 32;
/// 默认每多一层的概率(百分比)
pub const PERCENT: u16 = 25;

/// 新节点插入时, 由`LevelGenerator`决定节点占据的层数
///
/// `total()` 为允许的最大层数, `random()` 返回 `[1, total]` 之间的层数
pub trait LevelGenerator {
    fn random(&mut self) -> usize;
    fn total(&self) -> usize;
}

/// 按几何分布生成层数, 每多一层的概率为 `percent / 100`
///
/// # Examples
///
/// ```
/// use skipmap::{GeometricLevelGenerator, LevelGenerator};
/// fn main() {
///     let mut a = GeometricLevelGenerator::with_seed(16, 25, 7);
///     let mut b = GeometricLevelGenerator::with_seed(16, 25, 7);
///     for _ in 0..100 {
///         let level = a.random();
///         assert!(level >= 1 && level <= 16);
///         assert_eq!(level, b.random());
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GeometricLevelGenerator {
    total: usize,
    percent: u16,
    rng: SmallRng,
}

impl GeometricLevelGenerator {
    /// 从系统熵源初始化随机数, `total` 截断到 `[1, MAX_LEVEL]`, `percent` 截断到 `[0, 99]`, 为0时所有节点只有一层
    pub fn new(total: usize, percent: u16) -> Self {
        Self::with_rng(total, percent, SmallRng::from_os_rng())
    }

    /// 固定种子, 相同的种子产生相同的层数序列
    pub fn with_seed(total: usize, percent: u16, seed: u64) -> Self {
        Self::with_rng(total, percent, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(total: usize, percent: u16, rng: SmallRng) -> Self {
        Self {
            total: total.clamp(1, MAX_LEVEL),
            percent: percent.min(99),
            rng,
        }
    }

    pub fn percent(&self) -> u16 {
        self.percent
    }
}

impl Default for GeometricLevelGenerator {
    fn default() -> Self {
        Self::new(MAX_LEVEL, PERCENT)
    }
}

impl LevelGenerator for GeometricLevelGenerator {
    fn random(&mut self) -> usize {
        let mut level = 1;
        while level < self.total && self.rng.random_range(0..100u16) < self.percent {
            level += 1;
        }
        level
    }

    #[inline]
    fn total(&self) -> usize {
        self.total
    }
}

/// 跳表的层数配置
///
/// # Examples
///
/// ```
/// use skipmap::{LevelConfig, SkipMap};
/// fn main() {
///     let config = LevelConfig { max_level: 8, percent: 50, seed: Some(1) };
///     let mut val: SkipMap<i32, i32> = SkipMap::with_config(config);
///     for i in 0..100 {
///         val.try_emplace(i, i).unwrap();
///     }
///     assert!(val.level() <= 8);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    /// 截断到 `[1, MAX_LEVEL]`
    pub max_level: usize,
    /// 每多一层的概率(百分比), 截断到 `[0, 99]`
    pub percent: u16,
    /// 为`None`时从系统熵源取种子
    pub seed: Option<u64>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            max_level: MAX_LEVEL,
            percent: PERCENT,
            seed: None,
        }
    }
}

impl LevelConfig {
    pub fn build(&self) -> GeometricLevelGenerator {
        match self.seed {
            Some(seed) => GeometricLevelGenerator::with_seed(self.max_level, self.percent, seed),
            None => GeometricLevelGenerator::new(self.max_level, self.percent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GeometricLevelGenerator, LevelConfig, LevelGenerator, MAX_LEVEL};

    #[test]
    fn test_clamp() {
        let lg = GeometricLevelGenerator::with_seed(0, 0, 1);
        assert_eq!(lg.total(), 1);
        assert_eq!(lg.percent(), 0);
        let lg = GeometricLevelGenerator::with_seed(1000, 200, 1);
        assert_eq!(lg.total(), MAX_LEVEL);
        assert_eq!(lg.percent(), 99);
    }

    #[test]
    fn test_single_level() {
        let mut lg = GeometricLevelGenerator::with_seed(1, 99, 3);
        for _ in 0..1000 {
            assert_eq!(lg.random(), 1);
        }
    }

    #[test]
    fn test_zero_percent() {
        let mut lg = LevelConfig { max_level: 16, percent: 0, seed: Some(5) }.build();
        assert_eq!(lg.percent(), 0);
        for _ in 0..1000 {
            assert_eq!(lg.random(), 1);
        }
    }

    #[test]
    fn test_range() {
        let mut lg = GeometricLevelGenerator::with_seed(4, 90, 11);
        let mut seen_top = false;
        for _ in 0..1000 {
            let level = lg.random();
            assert!((1..=4).contains(&level));
            seen_top |= level == 4;
        }
        assert!(seen_top);
    }

    #[test]
    fn test_distribution() {
        // p = 1/2, 约一半节点只有一层
        let mut lg = GeometricLevelGenerator::with_seed(MAX_LEVEL, 50, 42);
        let total = 10000;
        let ones = (0..total).filter(|_| lg.random() == 1).count();
        assert!(ones > total * 4 / 10 && ones < total * 6 / 10, "ones = {}", ones);
    }

    #[test]
    fn test_same_seed() {
        let mut a = LevelConfig { seed: Some(99), ..Default::default() }.build();
        let mut b = LevelConfig { seed: Some(99), ..Default::default() }.build();
        let xs: Vec<usize> = (0..200).map(|_| a.random()).collect();
        let ys: Vec<usize> = (0..200).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }
}
