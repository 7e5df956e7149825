//! Fluent builder for constructing a [`Sim`].

use tracing::error;

use prowl_core::{AgentId, AgentRng, SimConfig, Vec3};
use prowl_coord::CoordTable;
use prowl_nav::{BlockerSet, Linecast, NavMesh, PathEngine};
use prowl_state::{StateKind, StateRegistry};
use prowl_world::{AgentBody, EligibilityPolicy, Role, Roster};

use crate::error::{AgentError, AgentResult};
use crate::machine::StateMachine;
use crate::sim::{AgentSlot, Sim};

/// Fluent builder for [`Sim<K, E>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — tick duration, decision interval, seed, fog cap
/// - `E: PathEngine` — the pathfinding implementation
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                       |
/// |-------------------|-------------------------------|
/// | `.mesh(m)`        | `NavMesh::empty()`            |
/// | `.blockers(b)`    | empty `BlockerSet`            |
/// | `.roster(r)`      | empty `Roster`                |
/// | `.eligibility(e)` | liveness-only policy          |
/// | `.coord(c)`       | fresh `CoordTable`            |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, DijkstraEngine)
///     .mesh(mesh)
///     .roster(roster)
///     .spawn(&registry, Vec3::ZERO)
///     .build()?;
/// sim.run_ticks(100, &mut NoopObserver)?;
/// ```
pub struct SimBuilder<K: StateKind, E: PathEngine> {
    config: SimConfig,
    engine: E,
    mesh: Option<NavMesh>,
    blockers: Option<Box<dyn Linecast>>,
    roster: Option<Roster>,
    eligibility: Option<EligibilityPolicy>,
    coord: CoordTable,
    agents: Vec<(AgentBody, StateMachine<K>)>,
    next_id: u32,
}

impl<K: StateKind, E: PathEngine> SimBuilder<K, E> {
    pub fn new(config: SimConfig, engine: E) -> Self {
        Self {
            config,
            engine,
            mesh: None,
            blockers: None,
            roster: None,
            eligibility: None,
            coord: CoordTable::new(),
            agents: Vec::new(),
            next_id: 0,
        }
    }

    /// Supply the walkable-surface graph.  Without one, every path query
    /// classifies as invalid (agents can still run purely reactive states).
    pub fn mesh(mut self, mesh: NavMesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Supply the blocking-geometry service.
    pub fn blockers(mut self, blockers: impl Linecast + 'static) -> Self {
        self.blockers = Some(Box::new(blockers));
        self
    }

    /// Supply the observable-entity roster.
    pub fn roster(mut self, roster: Roster) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Supply the eligibility policy (default: liveness only).
    pub fn eligibility(mut self, eligibility: EligibilityPolicy) -> Self {
        self.eligibility = Some(eligibility);
        self
    }

    /// Supply a pre-populated coordination table (e.g. with level rally
    /// points already registered).
    pub fn coord(mut self, coord: CoordTable) -> Self {
        self.coord = coord;
        self
    }

    /// Register a rally point on the coordination table.
    pub fn rally_point(mut self, position: Vec3) -> Self {
        self.coord.add_rally_point(position);
        self
    }

    /// Spawn an authoritative agent at `position` with default body fields.
    ///
    /// Agent IDs are assigned densely in spawn order, starting at 0.
    pub fn spawn(self, registry: &StateRegistry<K>, position: Vec3) -> Self {
        self.spawn_configured(registry, position, |_| {})
    }

    /// Spawn an agent and adjust its body (view caps, speed, role, HP…)
    /// before it ever ticks.
    ///
    /// A registry with no instantiable states is a startup dependency
    /// failure: the agent is logged and removed from the world instead of
    /// running half-initialized.
    pub fn spawn_configured(
        mut self,
        registry: &StateRegistry<K>,
        position: Vec3,
        configure: impl FnOnce(&mut AgentBody),
    ) -> Self {
        if registry.is_empty() {
            let err = AgentError::NoStatesRegistered(AgentId(self.next_id));
            error!(target: "prowl::agent", %err, "spawn rejected; agent removed from the world");
            return self;
        }

        let id = AgentId(self.next_id);
        self.next_id += 1;

        let mut body = AgentBody::new(id, Role::Authority, position);
        configure(&mut body);

        let machine = StateMachine::from_registry(registry, self.config.ai_interval_secs);
        self.agents.push((body, machine));
        self
    }

    /// Validate the configuration and produce a ready-to-run [`Sim`].
    pub fn build(self) -> AgentResult<Sim<K, E>> {
        if self.config.tick_duration_secs <= 0.0 {
            return Err(AgentError::Config("tick duration must be positive".into()));
        }
        if self.config.ai_interval_secs < self.config.tick_duration_secs {
            return Err(AgentError::Config(format!(
                "ai interval ({}s) must not be shorter than the tick ({}s)",
                self.config.ai_interval_secs, self.config.tick_duration_secs,
            )));
        }

        let seed = self.config.seed;
        let agents = self
            .agents
            .into_iter()
            .map(|(body, machine)| AgentSlot {
                rng: AgentRng::new(seed, body.id),
                body,
                machine,
            })
            .collect();

        Ok(Sim {
            clock: self.config.make_clock(),
            config: self.config,
            mesh: self.mesh.unwrap_or_else(NavMesh::empty),
            engine: self.engine,
            blockers: self.blockers.unwrap_or_else(|| Box::new(BlockerSet::new())),
            roster: self.roster.unwrap_or_default(),
            eligibility: self.eligibility.unwrap_or_default(),
            coord: self.coord,
            foggy: false,
            agents,
        })
    }
}
