use cfg_if::cfg_if;

/// Monotonic elapsed-time source, read once per frame
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start_ms: f64,
    last_ms: f64,
}

impl Clock {
    pub fn start() -> Self {
        Self::starting_at(now_ms())
    }

    pub fn starting_at(start_ms: f64) -> Self {
        Self { start_ms, last_ms: start_ms }
    }

    /// Seconds since start; never decreases even if the host timer does
    pub fn elapsed_at(&mut self, now_ms: f64) -> f32 {
        self.last_ms = self.last_ms.max(now_ms);
        ((self.last_ms - self.start_ms) / 1000.0) as f32
    }

    pub fn elapsed(&mut self) -> f32 {
        self.elapsed_at(now_ms())
    }
}

cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        pub fn now_ms() -> f64 {
            web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.now())
                .unwrap_or(0.0)
        }
    } else {
        use once_cell::sync::Lazy;
        use std::time::Instant;

        static ORIGIN: Lazy<Instant> = Lazy::new(Instant::now);

        pub fn now_ms() -> f64 {
            ORIGIN.elapsed().as_secs_f64() * 1000.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_in_seconds() {
        let mut clock = Clock::starting_at(1000.0);
        assert_eq!(clock.elapsed_at(1000.0), 0.0);
        assert_eq!(clock.elapsed_at(3500.0), 2.5);
    }

    #[test]
    fn test_elapsed_never_goes_backwards() {
        let mut clock = Clock::starting_at(0.0);
        assert_eq!(clock.elapsed_at(2000.0), 2.0);
        assert_eq!(clock.elapsed_at(1500.0), 2.0);
    }

    #[test]
    fn test_native_clock_is_monotonic() {
        let mut clock = Clock::start();
        let a = clock.elapsed();
        let b = clock.elapsed();
        assert!(b >= a);
    }
}
