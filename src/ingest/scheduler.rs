// src/ingest/scheduler.rs
use std::time::Duration;

/// Sequential pacing between upstream calls: the first turn is immediate,
/// every later turn waits `delay` first. Sources are visited one at a time,
/// never in parallel, so per-source caps stay deterministic.
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
    turns: usize,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, turns: 0 }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub async fn wait_turn(&mut self) {
        if self.turns > 0 && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.turns += 1;
    }

    pub fn turns(&self) -> usize {
        self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn first_turn_is_immediate_then_delayed() {
        let mut p = Pacer::from_millis(500);
        let t0 = Instant::now();
        p.wait_turn().await;
        assert_eq!(t0.elapsed(), Duration::ZERO);
        p.wait_turn().await;
        p.wait_turn().await;
        let waited = t0.elapsed();
        assert!(waited >= Duration::from_millis(1_000), "waited {waited:?}");
        assert!(waited < Duration::from_millis(1_100), "waited {waited:?}");
        assert_eq!(p.turns(), 3);
    }
}
