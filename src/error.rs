use std::collections::TryReserveError;

use thiserror::Error;

/// 跳表操作中可能出现的错误
#[derive(Debug, Error)]
pub enum SkipError {
    /// 新节点申请内存失败, 此时结构保持原样
    #[error("skip map allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}

pub type Result<T> = std::result::Result<T, SkipError>;

#[cfg(test)]
mod tests {
    use super::SkipError;

    #[test]
    fn test_alloc_display() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve(usize::MAX).unwrap_err();
        let err = SkipError::from(err);
        assert!(err.to_string().starts_with("skip map allocation failed"));
    }
}
