/// Server configuration - immutable after load
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub udp_port: u16,
    pub tick_rate_hz: u32,
    pub win_kill_count: u32,
    pub max_matches: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 8080,
            udp_port: 8081,
            tick_rate_hz: 60, // ~16ms per tick
            win_kill_count: 10,
            max_matches: 1000,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_interval_ms(&self) -> u64 {
        1000 / self.tick_rate_hz as u64
    }

    /// Tick duration in seconds - the dt every timer and velocity is scaled by
    pub fn tick_dt(&self) -> f64 {
        self.tick_interval_ms() as f64 / 1000.0
    }
}
