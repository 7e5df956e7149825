//! Unit tests for prowl-state.

use std::fmt;

use prowl_core::{AgentId, AgentRng, Tick, Vec3};
use prowl_coord::CoordTable;
use prowl_nav::{BlockerSet, DijkstraEngine, NavMesh};
use prowl_perception::Perception;
use prowl_world::{AgentBody, EligibilityPolicy, Role, Roster};

use crate::{
    first_satisfied, BehaviourState, InitPayload, PayloadValue, StateCtx, StateRegistry,
    StateKind, StateTransition, When,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
enum TestKind {
    Idle,
    Alert,
    Done,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl StateKind for TestKind {
    fn initial() -> Self {
        TestKind::Idle
    }
}

static ENGINE: DijkstraEngine = DijkstraEngine;

/// Run `f` with a fully-wired `StateCtx` over an empty world.
fn with_ctx<R>(f: impl FnOnce(&mut StateCtx<'_>) -> R) -> R {
    let mesh = NavMesh::empty();
    let blockers = BlockerSet::new();
    let roster = Roster::new();
    let eligibility = EligibilityPolicy::new();
    let view = Perception::new(&mesh, &ENGINE, &blockers, &roster, &eligibility);

    let mut body = AgentBody::new(AgentId(0), Role::Authority, Vec3::ZERO);
    let mut coord = CoordTable::new();
    let mut rng = AgentRng::new(42, AgentId(0));

    let mut ctx = StateCtx {
        tick: Tick(0),
        delta_secs: 0.05,
        body: &mut body,
        view: &view,
        coord: &mut coord,
        rng: &mut rng,
    };
    f(&mut ctx)
}

// ── Payload ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod payload_tests {
    use super::*;

    #[test]
    fn typed_accessors_roundtrip() {
        let payload = InitPayload::new()
            .with("skip_intro", PayloadValue::Bool(true))
            .with("charges", PayloadValue::Int(3))
            .with("spot", PayloadValue::Point(Vec3::new(1.0, 2.0, 3.0)));

        assert!(payload.flag("skip_intro"));
        assert_eq!(payload.int("charges"), Some(3));
        assert_eq!(payload.point("spot"), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn missing_and_mistyped_keys_read_conservatively() {
        let payload = InitPayload::new().with("charges", PayloadValue::Int(3));
        assert!(!payload.flag("charges"), "non-bool value is not a set flag");
        assert!(!payload.flag("absent"));
        assert_eq!(payload.float("charges"), None);
        assert!(InitPayload::new().is_empty());
    }
}

// ── Transitions ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod transition_tests {
    use super::*;

    #[test]
    fn declaration_order_is_priority() {
        // Both transitions are satisfied; the first declared must win.
        let mut transitions: Vec<Box<dyn StateTransition<TestKind>>> = vec![
            When::new(TestKind::Alert, |_| true).boxed(),
            When::new(TestKind::Done, |_| true).boxed(),
        ];
        with_ctx(|ctx| {
            let winner = first_satisfied(&mut transitions, ctx);
            assert_eq!(winner.map(|(i, k)| (i, k)), Some((0, TestKind::Alert)));
        });
    }

    #[test]
    fn unsatisfied_transitions_yield_none() {
        let mut transitions: Vec<Box<dyn StateTransition<TestKind>>> =
            vec![When::new(TestKind::Done, |_| false).boxed()];
        with_ctx(|ctx| {
            assert!(first_satisfied(&mut transitions, ctx).is_none());
        });
    }

    #[test]
    fn predicate_reads_the_context() {
        let mut transitions: Vec<Box<dyn StateTransition<TestKind>>> =
            vec![When::new(TestKind::Done, |ctx| ctx.body.hp <= 0).boxed()];
        with_ctx(|ctx| {
            assert!(first_satisfied(&mut transitions, ctx).is_none());
            ctx.body.hp = 0;
            assert_eq!(
                first_satisfied(&mut transitions, ctx).map(|(_, k)| k),
                Some(TestKind::Done)
            );
        });
    }

    #[test]
    fn effect_runs_only_on_taken() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let mut transition = When::new(TestKind::Done, |_| true).with_effect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        with_ctx(|ctx| {
            // Predicate evaluation alone has no side effects.
            assert!(transition.should_take(ctx));
            assert!(transition.should_take(ctx));
            assert_eq!(fired.load(Ordering::SeqCst), 0);

            transition.on_taken(ctx);
            assert_eq!(fired.load(Ordering::SeqCst), 1);
        });
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry_tests {
    use super::*;

    struct NullState;
    impl BehaviourState<TestKind> for NullState {}

    #[test]
    fn registered_kinds_instantiate() {
        let registry = StateRegistry::builder()
            .register(TestKind::Idle, || Box::new(NullState))
            .register(TestKind::Done, || Box::new(NullState))
            .build();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(TestKind::Idle));
        assert!(!registry.contains(TestKind::Alert));

        let instances = registry.instantiate_all();
        assert_eq!(instances.len(), 2);
        assert!(instances.contains_key(&TestKind::Done));
    }

    #[test]
    fn declared_without_factory_is_omitted() {
        // `Alert` is declared but never implemented: logged and dropped.
        let registry = StateRegistry::builder()
            .declare(TestKind::Alert)
            .register(TestKind::Idle, || Box::new(NullState))
            .build();

        assert!(!registry.contains(TestKind::Alert));
        assert_eq!(registry.instantiate_all().len(), 1);
    }

    #[test]
    fn each_agent_gets_private_instances() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        let registry = StateRegistry::builder()
            .register(TestKind::Idle, move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Box::new(NullState)
            })
            .build();

        let _first = registry.instantiate_all();
        let _second = registry.instantiate_all();
        assert_eq!(created.load(Ordering::SeqCst), 2, "one fresh instance per agent");
    }
}

// ── Context helpers ───────────────────────────────────────────────────────────

#[cfg(test)]
mod ctx_tests {
    use super::*;

    #[test]
    fn eye_and_cone_mirror_the_body() {
        with_ctx(|ctx| {
            ctx.body.view_range = 25.0;
            ctx.body.view_width_deg = 70.0;
            let cone = ctx.view_cone();
            assert_eq!(cone.range, 25.0);
            assert_eq!(cone.width_deg, 70.0);
            assert_eq!(ctx.eye().position, ctx.body.eye_point());
        });
    }
}
