//! Fluent builder for a [`CentralSim`].

use std::rc::Rc;
use std::time::Duration;

use rt_clock::TickDispatcher;
use rt_core::RandomModel;
use rt_pdp::World;
use rt_solver::{SolverHost, SolverSupplier};

use crate::{
    CentralConfig, CentralError, CentralResult, CentralSim, CentralState, ConsistencyChecker,
    RouteFollowingVehicle, RtCentral, Scenario, ScenarioDriver, StopCondition,
};

/// Wires a scenario, a solver supplier, and a configuration into a
/// [`CentralSim`].
///
/// | Method           | Default                     |
/// |------------------|-----------------------------|
/// | `.config(c)`     | `CentralConfig::default()`  |
///
/// The solver receives a seed drawn from a [`RandomModel`] seeded with
/// `config.seed`, so equal configurations give equal solver seeds.
pub struct CentralBuilder<S> {
    scenario: Scenario,
    supplier: S,
    config:   CentralConfig,
}

impl<S: SolverSupplier> CentralBuilder<S> {
    pub fn new(scenario: Scenario, supplier: S) -> Self {
        Self { scenario, supplier, config: CentralConfig::default() }
    }

    pub fn config(mut self, config: CentralConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate, start the solver (its `init` completes here), and register
    /// every listener.
    pub fn build(self) -> CentralResult<CentralSim> {
        if self.scenario.vehicles.is_empty() {
            return Err(CentralError::NoVehicles);
        }
        self.config.validate()?;

        let mut dispatcher = TickDispatcher::new(self.config.dispatch_config())?;

        let mut random = RandomModel::new(self.config.seed);
        let solver = self.supplier.get(random.provider().seed());
        let host = Rc::new(SolverHost::start(solver, dispatcher.clock())?);
        let checker = ConsistencyChecker::new();

        let Scenario { depot, vehicles, parcels } = self.scenario;
        let mut world = World::new(depot);
        let ids: Vec<_> = vehicles.into_iter().map(|v| world.add_vehicle(v)).collect();
        let pending_announcements = parcels.len();

        let settle = Duration::from_millis(self.config.tick_length_ms);
        dispatcher.register(ScenarioDriver::new(parcels));
        dispatcher.register(RtCentral::new(Rc::clone(&host), checker.clone(), settle));
        for id in ids {
            dispatcher.register(RouteFollowingVehicle::new(id, host.reader(), checker.clone()));
        }

        let stop = StopCondition::AnyOf(vec![
            StopCondition::TimeOut(self.config.time_out_ms),
            StopCondition::ScenarioComplete,
        ]);

        Ok(CentralSim {
            dispatcher,
            state: CentralState { world, pending_announcements },
            stop,
            host,
            checker,
        })
    }
}
