mod common;

use common::{pos, texts, Harness, TestWorld};
use rustc_hash::FxHashSet;
use tagcraft_blocks::Block;
use tagcraft_core::area::{AreaBuilder, AreaError, AreaSettings, AreaState, PassOutcome};
use tagcraft_core::chat::Recipient;
use tagcraft_core::scheduler::{Task, TickScheduler};
use tagcraft_core::SessionConfig;

const GROUND: i32 = 64;

fn builder() -> (AreaBuilder, TickScheduler) {
    (AreaBuilder::new(AreaSettings::default()), TickScheduler::new())
}

/// Runs every task due in the next `ticks` ticks and returns the outcomes.
fn run_ticks(
    builder: &mut AreaBuilder,
    world: &mut TestWorld,
    scheduler: &mut TickScheduler,
    ticks: usize,
) -> Vec<Result<PassOutcome, AreaError>> {
    let mut outcomes = Vec::new();
    for _ in 0..ticks {
        for (_, task) in scheduler.advance() {
            assert_eq!(task, Task::TagAreaPass);
            outcomes.push(builder.run_pass(world, scheduler));
        }
    }
    outcomes
}

#[test]
fn perimeter_of_five_has_sixteen_columns() {
    let (mut builder, mut scheduler) = builder();
    let center = pos(7, GROUND + 1, -3);
    builder.build(center, 5, &mut scheduler).unwrap();

    let pending = builder.build_state().pending().copied().collect::<Vec<_>>();
    assert_eq!(pending.len(), 16);
    assert_eq!(pending.iter().collect::<FxHashSet<_>>().len(), 16);
    for column in &pending {
        assert_eq!(column.y, center.y);
        assert_eq!(column.horizontal_chebyshev(center), 2);
    }
}

#[test]
fn second_build_is_rejected_without_mutation() {
    let (mut builder, mut scheduler) = builder();
    builder.build(pos(0, 65, 0), 6, &mut scheduler).unwrap();
    let before = builder.build_state().pending().copied().collect::<Vec<_>>();
    let scheduled = scheduler.pending_count();

    let err = builder.build(pos(50, 65, 50), 9, &mut scheduler).unwrap_err();
    assert_eq!(
        err,
        AreaError::InvalidState {
            action: "built",
            state: AreaState::Building
        }
    );
    assert_eq!(builder.build_state().pending().copied().collect::<Vec<_>>(), before);
    assert_eq!(builder.snapshot().side_length, Some(6));
    assert_eq!(scheduler.pending_count(), scheduled);
}

#[test]
fn unloaded_world_keeps_pending_until_it_loads() {
    let mut world = TestWorld::new(GROUND);
    world.set_all_unloaded(true);
    let (mut builder, mut scheduler) = builder();
    builder.build(pos(0, GROUND + 1, 0), 5, &mut scheduler).unwrap();
    let before = builder.build_state().pending().copied().collect::<Vec<_>>();

    let outcomes = run_ticks(&mut builder, &mut world, &mut scheduler, 100);
    assert_eq!(outcomes.len(), 5);
    for outcome in outcomes {
        assert_eq!(
            outcome,
            Ok(PassOutcome::InProgress {
                state: AreaState::Building,
                remaining: 16
            })
        );
    }
    assert_eq!(builder.build_state().pending().copied().collect::<Vec<_>>(), before);
    assert!(builder.snapshot().retry_scheduled);
    assert_eq!(world.write_count(), 0);

    world.set_all_unloaded(false);
    let outcomes = run_ticks(&mut builder, &mut world, &mut scheduler, 20);
    assert_eq!(
        outcomes,
        [Ok(PassOutcome::Complete {
            state: AreaState::Built
        })]
    );
    assert_eq!(builder.build_state().committed().len(), 16);
    assert_eq!(world.write_count(), 16);
    assert!(!builder.snapshot().retry_scheduled);
    assert_eq!(scheduler.pending_count(), 0);
}

#[test]
fn existing_border_is_confirmed_without_writes() {
    let mut world = TestWorld::new(GROUND);
    let center = pos(0, GROUND + 1, 0);
    for column in tagcraft_core::area::perimeter::perimeter(center, 7) {
        world.place(column, Block::BorderBlock);
    }

    let (mut builder, mut scheduler) = builder();
    builder.build(center, 7, &mut scheduler).unwrap();
    run_ticks(&mut builder, &mut world, &mut scheduler, 1);

    assert_eq!(builder.state(), AreaState::Built);
    assert_eq!(builder.build_state().pending().len(), 0);
    assert_eq!(builder.build_state().committed().len(), 24);
    assert_eq!(world.write_count(), 0);
}

#[test]
fn border_goes_on_top_of_obstacles() {
    let mut world = TestWorld::new(GROUND);
    let center = pos(0, GROUND + 1, 0);
    let column = tagcraft_core::area::perimeter::perimeter(center, 3)[0];
    world.place(column, Block::OakLeaves);
    world.place(column.up(1), Block::OakLeaves);

    let (mut builder, mut scheduler) = builder();
    builder.build(center, 3, &mut scheduler).unwrap();
    run_ticks(&mut builder, &mut world, &mut scheduler, 1);

    assert_eq!(builder.state(), AreaState::Built);
    assert_eq!(world.block_at(column.up(2)), Block::BorderBlock);
    assert!(builder.build_state().committed().any(|p| *p == column.up(2)));
}

#[test]
fn reset_after_partial_build_forgets_unbuilt_columns() {
    let mut world = TestWorld::new(GROUND);
    let center = pos(0, GROUND + 1, 0);
    // The west edge of a side-5 square sits at x = -2.
    for z in -2..=2 {
        world.unload_column(-2, z);
    }

    let (mut builder, mut scheduler) = builder();
    builder.build(center, 5, &mut scheduler).unwrap();
    run_ticks(&mut builder, &mut world, &mut scheduler, 1);
    assert_eq!(builder.state(), AreaState::Building);
    assert_eq!(builder.build_state().pending().len(), 5);
    assert_eq!(builder.build_state().committed().len(), 11);

    builder.reset(&mut scheduler).unwrap();
    assert_eq!(builder.build_state().pending().len(), 0);
    run_ticks(&mut builder, &mut world, &mut scheduler, 1);

    assert_eq!(builder.state(), AreaState::None);
    assert_eq!(scheduler.pending_count(), 0);
    for x in -2..=2 {
        for z in -2..=2 {
            assert_ne!(world.block_at(pos(x, GROUND + 1, z)), Block::BorderBlock);
        }
    }

    // The unloaded columns were never touched.
    for z in -2..=2 {
        world.load_column(-2, z);
        assert_eq!(world.block_at(pos(-2, GROUND + 1, z)), Block::Air);
    }
}

#[test]
fn reset_waits_for_unloaded_border_blocks() {
    let mut world = TestWorld::new(GROUND);
    let (mut builder, mut scheduler) = builder();
    builder.build(pos(0, GROUND + 1, 0), 3, &mut scheduler).unwrap();
    run_ticks(&mut builder, &mut world, &mut scheduler, 1);
    assert_eq!(builder.state(), AreaState::Built);

    world.unload_column(1, 1);
    builder.reset(&mut scheduler).unwrap();
    run_ticks(&mut builder, &mut world, &mut scheduler, 1);
    assert_eq!(builder.state(), AreaState::Resetting);
    assert_eq!(builder.build_state().committed().len(), 1);

    world.load_column(1, 1);
    run_ticks(&mut builder, &mut world, &mut scheduler, 20);
    assert_eq!(builder.state(), AreaState::None);
    assert_eq!(world.block_at(pos(1, GROUND + 1, 1)), Block::Air);
}

#[test]
fn reset_waits_for_replaced_border_blocks() {
    let mut world = TestWorld::new(GROUND);
    let (mut builder, mut scheduler) = builder();
    builder.build(pos(0, GROUND + 1, 0), 3, &mut scheduler).unwrap();
    run_ticks(&mut builder, &mut world, &mut scheduler, 1);

    let replaced = *builder.build_state().committed().next().unwrap();
    world.place(replaced, Block::Stone);
    let writes = world.write_count();

    builder.reset(&mut scheduler).unwrap();
    let outcomes = run_ticks(&mut builder, &mut world, &mut scheduler, 41);
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|outcome| *outcome
        == Ok(PassOutcome::InProgress {
            state: AreaState::Resetting,
            remaining: 1
        })));
    assert_eq!(builder.build_state().committed().copied().collect::<Vec<_>>(), [replaced]);
    assert_eq!(world.block_at(replaced), Block::Stone);
    assert_eq!(world.write_count(), writes + 7);
    assert!(builder.snapshot().retry_scheduled);

    // Someone mined the stone; the next pass finds air and finishes.
    world.place(replaced, Block::Air);
    let outcomes = run_ticks(&mut builder, &mut world, &mut scheduler, 20);
    assert_eq!(
        outcomes,
        [Ok(PassOutcome::Complete {
            state: AreaState::None
        })]
    );
    assert_eq!(world.write_count(), writes + 7);
    assert_eq!(scheduler.pending_count(), 0);
}

#[test]
fn failing_pass_keeps_retrying() {
    let mut world = TestWorld::new(GROUND);
    world.set_reject_writes(true);
    let (mut builder, mut scheduler) = builder();
    builder.build(pos(0, GROUND + 1, 0), 4, &mut scheduler).unwrap();

    let outcomes = run_ticks(&mut builder, &mut world, &mut scheduler, 1);
    assert!(matches!(outcomes[..], [Err(AreaError::BlockUpdate { .. })]));
    assert_eq!(builder.state(), AreaState::Building);
    assert!(builder.snapshot().retry_scheduled);

    let outcomes = run_ticks(&mut builder, &mut world, &mut scheduler, 20);
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_err());
    assert!(builder.snapshot().retry_scheduled);
    assert_eq!(scheduler.pending_count(), 1);

    world.set_reject_writes(false);
    let outcomes = run_ticks(&mut builder, &mut world, &mut scheduler, 20);
    assert_eq!(
        outcomes,
        [Ok(PassOutcome::Complete {
            state: AreaState::Built
        })]
    );
    assert_eq!(scheduler.pending_count(), 0);
}

#[test]
fn border_commands_drive_the_builder() {
    let mut harness = Harness::new();
    harness.load_chunks_around_origin(1);
    let admin = harness.admin;

    let messages = harness.chat(admin, ".bb 5");
    assert_eq!(
        texts(&messages),
        ["Building a border with a side length of 5 around (0, 65, 0)."]
    );
    assert_eq!(harness.session.tag_area().state(), AreaState::Building);

    let messages = harness.ticks(1);
    assert_eq!(
        texts(&messages),
        ["[Background Processing Complete] TagArea.State: BUILT."]
    );
    assert_eq!(messages[0].recipient, Recipient::Player("Admin".to_string()));

    let messages = harness.chat(admin, ".gta");
    assert!(messages[0].text.contains("\"state\": \"BUILT\""));
    assert!(messages[0].text.contains("\"committedCount\": 16"));

    harness.chat(admin, ".rb");
    let messages = harness.ticks(1);
    assert_eq!(
        texts(&messages),
        ["[Background Processing Complete] TagArea.State: NONE."]
    );
    assert_eq!(harness.session.tag_area().state(), AreaState::None);
}

#[test]
fn border_commands_report_area_errors() {
    let mut harness = Harness::new();
    let admin = harness.admin;

    let messages = harness.chat(admin, ".bb 2");
    assert!(messages[0].is_error);
    assert_eq!(
        messages[0].text,
        "The side length must be greater than 2 and at most 512, got 2."
    );

    let messages = harness.chat(admin, ".bb 5.5");
    assert!(messages[0].is_error);

    let messages = harness.chat(admin, ".rb");
    assert_eq!(
        messages[0].text,
        "The tag area is not in a state that can be reset. Current state: NONE."
    );
}

#[test]
fn debug_mode_reports_progress() {
    let mut harness = Harness::new();
    let admin = harness.admin;

    harness.chat(admin, ".sd true");
    harness.chat(admin, ".bb 5");
    let messages = harness.ticks(1);
    assert_eq!(
        texts(&messages),
        ["[Background Processing] TagArea.State: BUILDING, 16 blocks remaining."]
    );

    harness.load_chunks_around_origin(1);
    let messages = harness.ticks(20);
    assert_eq!(
        texts(&messages),
        ["[Background Processing Complete] TagArea.State: BUILT."]
    );
}

#[test]
fn oversized_border_is_rejected_without_building() {
    let mut harness = Harness::new();
    harness.load_chunks_around_origin(1);
    let admin = harness.admin;

    let messages = harness.chat(admin, ".bb 1000000000");
    assert_eq!(
        texts(&messages),
        ["The side length must be greater than 2 and at most 512, got 1000000000."]
    );
    assert!(messages[0].is_error);

    let messages = harness.chat(admin, ".bb 1e12");
    assert_eq!(
        texts(&messages),
        ["The side length must be greater than 2 and at most 512, got 2147483647."]
    );
    assert_eq!(harness.session.tag_area().state(), AreaState::None);
    assert_eq!(harness.session.game.scheduler.pending_count(), 0);

    let config = SessionConfig {
        area_max_side_length: 4,
        ..SessionConfig::default()
    };
    let mut harness = Harness::with_config(config);
    let admin = harness.admin;
    let messages = harness.chat(admin, ".bb 5");
    assert_eq!(
        texts(&messages),
        ["The side length must be greater than 2 and at most 4, got 5."]
    );
}
