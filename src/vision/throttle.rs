/// 重算節流
///
/// 距離上次重算不足 interval 個 tick 且沒有髒標記時跳過
#[derive(Debug, Clone)]
pub struct RecomputePolicy {
    interval: u64,
    last_tick: Option<u64>,
    dirty: bool,
}

impl RecomputePolicy {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            last_tick: None,
            dirty: false,
        }
    }

    /// 下一次呼叫強制重算
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// 這個 tick 是否需要重算
    pub fn needs_recompute(&self, tick: u64) -> bool {
        if self.dirty {
            return true;
        }
        match self.last_tick {
            None => true,
            // tick 倒退代表宿主重新計時
            Some(last) if tick < last => true,
            Some(last) => tick - last >= self.interval,
        }
    }

    /// 重算完成後呼叫
    pub fn record(&mut self, tick: u64) {
        self.last_tick = Some(tick);
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_recomputes() {
        let policy = RecomputePolicy::new(5);
        assert!(policy.needs_recompute(0));
        assert!(policy.needs_recompute(1234));
    }

    #[test]
    fn test_interval_throttles() {
        let mut policy = RecomputePolicy::new(5);
        policy.record(10);
        assert!(!policy.needs_recompute(10));
        assert!(!policy.needs_recompute(14));
        assert!(policy.needs_recompute(15));
        assert!(policy.needs_recompute(40));
    }

    #[test]
    fn test_dirty_overrides_interval() {
        let mut policy = RecomputePolicy::new(5);
        policy.record(10);
        policy.mark_dirty();
        assert!(policy.needs_recompute(11));
        policy.record(11);
        assert!(!policy.needs_recompute(12));
    }

    #[test]
    fn test_backwards_tick_recomputes() {
        let mut policy = RecomputePolicy::new(5);
        policy.record(100);
        assert!(policy.needs_recompute(3));
    }

    #[test]
    fn test_zero_interval_clamped() {
        let mut policy = RecomputePolicy::new(0);
        policy.record(4);
        assert!(!policy.needs_recompute(4));
        assert!(policy.needs_recompute(5));
    }
}
