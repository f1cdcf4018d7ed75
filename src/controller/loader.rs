use std::sync::mpsc::{self, Receiver, TryRecvError};

use tracing::{info, warn};

use crate::config::SceneConfig;
use crate::model::Population;

/// Builds the title mesh and background list off the frame path and hands
/// the result back through a channel polled once per frame.
pub struct PopulationLoader {
    rx: Option<Receiver<Population>>,
}

impl PopulationLoader {
    pub fn spawn(config: SceneConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let job = move || {
            let population = Population::generate(&config);
            info!(count = population.background.len(), "background population generated");
            // receiver dropped means the loop shut down first
            let _ = tx.send(population);
        };

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move { job() });

        #[cfg(not(target_arch = "wasm32"))]
        if let Err(e) = std::thread::Builder::new().name("population".into()).spawn(job) {
            warn!("population thread failed to start: {e}");
        }

        Self { rx: Some(rx) }
    }

    /// Non-blocking; yields the population exactly once
    pub fn poll(&mut self) -> Option<Population> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(population) => {
                self.rx = None;
                Some(population)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("population loader disconnected without a result");
                self.rx = None;
                None
            }
        }
    }

    pub fn is_done(&self) -> bool {
        self.rx.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_population_arrives_once() {
        let config = SceneConfig { background_count: 20, ..Default::default() };
        let mut loader = PopulationLoader::spawn(config);

        let mut received = None;
        for _ in 0..500 {
            if let Some(p) = loader.poll() {
                received = Some(p);
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        let population = received.expect("population never arrived");
        assert_eq!(population.background.len(), 20);
        assert!(loader.is_done());
        assert!(loader.poll().is_none());
    }
}
