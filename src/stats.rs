use std::collections::VecDeque;
use std::time::Instant;

/// Maximum number of samples retained for the history plot.
const MAX_HISTORY: usize = 512;

/// Population snapshot at a given generation.
#[derive(Debug, Clone, Copy)]
pub struct StatsSample {
    pub generation: u64,
    pub alive: u64,
    pub trees: u64,
}

/// Ring buffer of population history feeding the plot panel. Recorded from
/// the control loop right after each tick, so no locking is needed.
#[derive(Debug)]
pub struct Stats {
    history: VecDeque<StatsSample>,
    /// Most recent tick rate (ticks per second).
    tick_rate: f64,
    last_gen: u64,
    last_rate_time: Instant,
    total_cells: u64,
}

impl Stats {
    pub fn new(total_cells: u64) -> Self {
        Self {
            history: VecDeque::with_capacity(MAX_HISTORY),
            tick_rate: 0.0,
            last_gen: 0,
            last_rate_time: Instant::now(),
            total_cells,
        }
    }

    /// Record a sample for the given generation.
    pub fn record(&mut self, generation: u64, alive: u64, trees: u64) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_rate_time).as_secs_f64();
        if dt > 0.25 {
            let dg = generation.saturating_sub(self.last_gen) as f64;
            self.tick_rate = dg / dt;
            self.last_gen = generation;
            self.last_rate_time = now;
        }

        if self.history.len() >= MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(StatsSample {
            generation,
            alive,
            trees,
        });
    }

    /// Drop history, e.g. after randomize/clear.
    pub fn reset(&mut self) {
        self.history.clear();
        self.tick_rate = 0.0;
        self.last_gen = 0;
        self.last_rate_time = Instant::now();
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    pub fn latest_alive(&self) -> u64 {
        self.history.back().map(|s| s.alive).unwrap_or(0)
    }

    pub fn latest_trees(&self) -> u64 {
        self.history.back().map(|s| s.trees).unwrap_or(0)
    }

    pub fn latest_density(&self) -> f64 {
        if self.total_cells == 0 {
            return 0.0;
        }
        let occupied = self.latest_alive() + self.latest_trees();
        occupied as f64 / self.total_cells as f64
    }

    /// Alive history as (generation, count) points for plotting.
    pub fn alive_history(&self) -> Vec<[f64; 2]> {
        self.history
            .iter()
            .map(|s| [s.generation as f64, s.alive as f64])
            .collect()
    }

    /// Tree history as (generation, count) points for plotting.
    pub fn tree_history(&self) -> Vec<[f64; 2]> {
        self.history
            .iter()
            .map(|s| [s.generation as f64, s.trees as f64])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_read() {
        let mut stats = Stats::new(100);
        stats.record(1, 25, 10);
        assert_eq!(stats.latest_alive(), 25);
        assert_eq!(stats.latest_trees(), 10);
        assert!((stats.latest_density() - 0.35).abs() < f64::EPSILON);
    }

    #[test]
    fn test_history_series() {
        let mut stats = Stats::new(1000);
        for i in 0..10 {
            stats.record(i, i * 100, i);
        }
        let alive = stats.alive_history();
        let trees = stats.tree_history();
        assert_eq!(alive.len(), 10);
        assert!((alive[9][1] - 900.0).abs() < f64::EPSILON);
        assert!((trees[9][1] - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut stats = Stats::new(100);
        for i in 0..600 {
            stats.record(i, 50, 0);
        }
        assert!(stats.alive_history().len() <= MAX_HISTORY);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut stats = Stats::new(100);
        stats.record(1, 50, 5);
        stats.reset();
        assert!(stats.alive_history().is_empty());
        assert_eq!(stats.latest_alive(), 0);
    }
}
