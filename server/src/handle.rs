use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{ControlResponse, PopulationSnapshot, ReconfigureRequest, SimulationStats};
use sim::{SimError, Simulation, SimulationConfig};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared access to the running simulation.
///
/// The ticker, pause/resume and reconfigure all go through the same lock, so
/// a reconfigure can never land in the middle of a step.
#[derive(Clone)]
pub struct SimulationHandle {
    inner: Arc<RwLock<HandleInner>>,
}

struct HandleInner {
    simulation: Simulation<StdRng>,

    /// Published after every successful step
    latest: Arc<PopulationSnapshot>,
}

impl SimulationHandle {
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: SimulationConfig, rng: StdRng) -> Result<Self, SimError> {
        let simulation = Simulation::new(config, rng)?;
        let latest = Arc::new(simulation.snapshot());

        Ok(Self {
            inner: Arc::new(RwLock::new(HandleInner { simulation, latest })),
        })
    }

    /// Run one tick and publish a fresh snapshot; `false` while paused
    pub async fn tick(&self) -> bool {
        let mut inner = self.inner.write().await;
        if inner.simulation.step().is_none() {
            return false;
        }
        let snapshot = inner.simulation.snapshot();
        inner.latest = Arc::new(snapshot);
        true
    }

    /// Latest published snapshot
    pub async fn snapshot(&self) -> Arc<PopulationSnapshot> {
        self.inner.read().await.latest.clone()
    }

    pub async fn stats(&self) -> SimulationStats {
        self.inner.read().await.latest.stats.clone()
    }

    pub async fn pause(&self) -> ControlResponse {
        let mut inner = self.inner.write().await;
        inner.simulation.pause();
        inner.republish()
    }

    pub async fn resume(&self) -> ControlResponse {
        let mut inner = self.inner.write().await;
        inner.simulation.resume();
        inner.republish()
    }

    pub async fn reconfigure(&self, request: ReconfigureRequest) -> Result<ControlResponse, SimError> {
        let mut inner = self.inner.write().await;
        inner.simulation.reconfigure(
            request.population,
            request.mutation_rate,
            request.elitism_bias,
        )?;
        Ok(inner.republish())
    }
}

impl HandleInner {
    fn republish(&mut self) -> ControlResponse {
        self.latest = Arc::new(self.simulation.snapshot());
        ControlResponse {
            run_id: self.simulation.run_id(),
            paused: self.simulation.is_paused(),
            tick: self.simulation.tick(),
        }
    }
}
