//! lurker — smallest runnable creature built on the prowl framework.
//!
//! Two lurkers patrol a small courtyard with a sight-blocking wall and two
//! bystanders.  One bystander gets moved mid-run to provoke a stalk, and one
//! lurker takes a hit to provoke a flee.  State changes stream through both
//! the driver observer and a `Replicated` subscription, mirroring how an
//! engine-side renderer would follow the authoritative machine.

mod states;

use std::sync::Arc;

use anyhow::Result;

use prowl_agent::{Sim, SimBuilder, SimObserver};
use prowl_core::{AgentId, SimConfig, Vec3, WaypointId};
use prowl_nav::{BlockerSet, DijkstraEngine, GeometryMask, NavMeshBuilder};
use prowl_perception::Waypoint;
use prowl_state::{HitEvent, StateKind};
use prowl_world::Roster;

use states::{death_transition, lurker_registry, HurtSince, LurkerState};

// ── Constants ─────────────────────────────────────────────────────────────────

const LURKER_COUNT:     usize = 2;
const SEED:             u64   = 42;
const TICK_SECS:        f32   = 0.05; // 20 Hz step
const AI_INTERVAL_SECS: f32   = 0.2;
const RUN_TICKS:        u64   = 400;  // 20 simulated seconds

/// Courtyard half-extent; mesh nodes sit on a grid inside it.
const COURTYARD: f32 = 20.0;
const GRID_STEP: f32 = 4.0;

// ── World construction ────────────────────────────────────────────────────────

/// Square grid mesh with 4-connected links.
fn build_mesh() -> prowl_nav::NavMesh {
    let per_side = (2.0 * COURTYARD / GRID_STEP) as i32 + 1;
    let mut b = NavMeshBuilder::with_capacity(
        (per_side * per_side) as usize,
        (per_side * per_side * 4) as usize,
    );

    let node_at = |ix: i32, iz: i32| (ix * per_side + iz) as u32;
    for ix in 0..per_side {
        for iz in 0..per_side {
            b.add_node(Vec3::new(
                -COURTYARD + ix as f32 * GRID_STEP,
                0.0,
                -COURTYARD + iz as f32 * GRID_STEP,
            ));
        }
    }
    for ix in 0..per_side {
        for iz in 0..per_side {
            if ix + 1 < per_side {
                b.add_link(
                    prowl_core::NodeId(node_at(ix, iz)),
                    prowl_core::NodeId(node_at(ix + 1, iz)),
                );
            }
            if iz + 1 < per_side {
                b.add_link(
                    prowl_core::NodeId(node_at(ix, iz)),
                    prowl_core::NodeId(node_at(ix, iz + 1)),
                );
            }
        }
    }
    b.build()
}

/// Patrol waypoints: the four corners plus the center.
fn build_waypoints() -> Vec<Waypoint> {
    let c = COURTYARD - 2.0;
    [
        Vec3::new(-c, 0.0, -c),
        Vec3::new(-c, 0.0, c),
        Vec3::new(c, 0.0, -c),
        Vec3::new(c, 0.0, c),
        Vec3::ZERO,
    ]
    .into_iter()
    .enumerate()
    .map(|(i, position)| Waypoint::new(WaypointId(i as u32), position))
    .collect()
}

fn build_blockers() -> BlockerSet {
    let mut blockers = BlockerSet::new();
    // One long wall through the middle of the courtyard.
    blockers.add_box(
        Vec3::new(-10.0, 0.0, -0.5),
        Vec3::new(10.0, 3.0, 0.5),
        GeometryMask::SIGHT | GeometryMask::MOVEMENT,
    );
    blockers
}

fn build_roster() -> Roster {
    let mut roster = Roster::new();
    roster.push(Vec3::new(15.0, 0.0, 12.0), Vec3::new(-1.0, 0.0, 0.0));
    roster.push(Vec3::new(-14.0, 0.0, -10.0), Vec3::new(1.0, 0.0, 0.0));
    roster
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Narrator {
    switches: usize,
}

impl SimObserver<LurkerState> for Narrator {
    fn on_state_change(&mut self, agent: AgentId, from: Option<LurkerState>, to: LurkerState) {
        self.switches += 1;
        tracing::info!(target: "lurker", %agent, ?from, %to, "state change");
    }

    fn on_round_end(&mut self) {
        tracing::info!(target: "lurker", "round over, claims flushed");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = SimConfig {
        tick_duration_secs: TICK_SECS,
        ai_interval_secs:   AI_INTERVAL_SECS,
        seed:               SEED,
        fog_range_cap:      30.0,
    };

    let waypoints = Arc::new(build_waypoints());
    let registry = lurker_registry(Arc::clone(&waypoints));

    let mut builder = SimBuilder::new(config, DijkstraEngine)
        .mesh(build_mesh())
        .blockers(build_blockers())
        .roster(build_roster())
        .rally_point(Vec3::new(0.0, 0.0, 18.0))
        .rally_point(Vec3::new(0.0, 0.0, -18.0));

    for i in 0..LURKER_COUNT {
        let x = -8.0 + i as f32 * 16.0;
        builder = builder.spawn_configured(&registry, Vec3::new(x, 0.0, -16.0), |body| {
            body.view_range = 25.0;
            body.view_width_deg = 140.0;
            body.max_speed = 4.0;
            body.hp = 3;
            body.facing = Vec3::new(0.0, 0.0, 1.0);
        });
    }

    let mut sim: Sim<LurkerState, DijkstraEngine> = builder.build()?;

    // Per-agent global transitions: death preempts everything, pain routes
    // into Flee.
    for agent in sim.agent_ids().collect::<Vec<_>>() {
        if let Some(machine) = sim.machine_mut(agent) {
            machine.add_global_transition(death_transition());
            machine.add_global_transition(HurtSince::boxed());
        }
    }

    // A replication subscriber, standing in for a render-side mirror.
    if let Some(machine) = sim.machine_mut(AgentId(0)) {
        machine.published().subscribe(|old, new| {
            tracing::debug!(target: "lurker", ?old, ?new, "replicated state for agent 0");
        });
    }

    let mut narrator = Narrator::default();

    tracing::info!(target: "lurker", agents = sim.agent_count(), "run starting");
    sim.run_ticks(RUN_TICKS / 2, &mut narrator);

    // Walk a bystander into lurker 0's view cone.
    sim.roster.position[0] = Vec3::new(-8.0, 0.0, -6.0);
    sim.run_ticks(RUN_TICKS / 4, &mut narrator);

    // Wing lurker 1: the pain transition should send it fleeing.
    sim.hit_agent(AgentId(1), HitEvent::new(1, None))?;
    sim.run_ticks(RUN_TICKS / 4, &mut narrator);

    sim.end_round(&mut narrator);

    for agent in sim.agent_ids().collect::<Vec<_>>() {
        let state = sim
            .machine(agent)
            .and_then(|machine| machine.current())
            .unwrap_or_else(LurkerState::initial);
        let body = sim.body(agent).expect("agent body");
        tracing::info!(
            target: "lurker",
            %agent,
            %state,
            position = %body.position,
            hp = body.hp,
            "final"
        );
    }
    tracing::info!(target: "lurker", switches = narrator.switches, "run complete");

    Ok(())
}
