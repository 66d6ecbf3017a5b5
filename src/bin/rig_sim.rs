//! Headless Rig Simulation
//!
//! Drives one character rig through a scripted run in a small static level
//! at a fixed 60 Hz step and logs the pose once per simulated second.
//!
//! Usage: `rig_sim [config.json]`. Without an argument the built-in defaults
//! are used. Set `RUST_LOG=rig=trace` to see every frame.

use std::process::ExitCode;

use escape_run_engine::config::RigConfig;
use escape_run_engine::frame::CharacterRig;
use escape_run_engine::input::{FrameInput, ScriptedInput};
use escape_run_engine::logging;
use escape_run_engine::physics::{Aabb, StaticWorld};
use escape_run_engine::player::AnimationLog;
use glam::{Vec2, Vec3};
use tracing::{error, info};

const FIXED_DT: f32 = 1.0 / 60.0;
const FRAMES_PER_SECOND: usize = 60;

/// Ground plane, a wall behind the spawn point and a low crate ahead.
fn build_level() -> StaticWorld {
    StaticWorld::with_ground(0.0)
        .with_box(
            Aabb::new(Vec3::new(-6.0, 0.0, 2.5), Vec3::new(6.0, 4.0, 3.5)),
            1,
        )
        .with_box(
            Aabb::new(Vec3::new(-1.0, 0.0, -14.0), Vec3::new(1.0, 0.5, -12.0)),
            1,
        )
}

/// Walk, look around, run, jump, roll, crouch, unlock the cursor.
fn build_script() -> ScriptedInput {
    let forward = FrameInput::moving(Vec2::Y);
    let run = FrameInput {
        run: true,
        ..forward
    };

    ScriptedInput::new()
        .idle(30)
        .repeat(forward, 90)
        .repeat(FrameInput::looking(Vec2::new(2.0, 0.0)), 15)
        .repeat(run, 60)
        .then(FrameInput {
            jump: true,
            ..run
        })
        .repeat(run, 60)
        .then(FrameInput {
            roll: true,
            ..forward
        })
        .idle(45)
        .then(FrameInput {
            crouch: true,
            ..FrameInput::default()
        })
        .repeat(FrameInput::moving(Vec2::new(1.0, 0.0)), 60)
        .then(FrameInput {
            crouch: true,
            ..FrameInput::default()
        })
        .then(FrameInput {
            escape: true,
            ..FrameInput::default()
        })
        .repeat(FrameInput::looking(Vec2::new(5.0, 5.0)), 30)
        .idle(30)
}

fn main() -> ExitCode {
    logging::init();

    println!("===========================================");
    println!("   Escape Run - Rig Simulation");
    println!("===========================================");
    println!();

    let config = match std::env::args().nth(1) {
        Some(path) => match RigConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                error!(target: "rig", %err, "could not load config");
                return ExitCode::FAILURE;
            }
        },
        None => RigConfig::default(),
    };

    let world = build_level();
    let mut rig = CharacterRig::new(&config, Vec3::ZERO, &world);
    let mut script = build_script();
    let mut animation = AnimationLog::default();

    info!(
        target: "rig",
        frames = script.remaining(),
        order = ?rig.order(),
        "starting simulation"
    );

    while !script.is_finished() {
        let report = rig.step(FIXED_DT, &mut script, &world, Some(&mut animation));

        if report.frame as usize % FRAMES_PER_SECOND == 0 {
            info!(
                target: "rig",
                second = report.frame as usize / FRAMES_PER_SECOND,
                state = report.state.name(),
                position = ?report.position,
                camera = ?report.camera.position,
                distance = rig.camera().effective_distance(),
                cursor_locked = report.cursor_locked,
                "pose"
            );
        }
    }

    let final_position = rig.locomotion().position();
    info!(
        target: "rig",
        frames = rig.frame(),
        position = ?final_position,
        jumps = animation.count(escape_run_engine::player::AnimationTrigger::Jump),
        rolls = animation.count(escape_run_engine::player::AnimationTrigger::Roll),
        "simulation finished"
    );
    println!(
        "Finished after {} frames at ({:.2}, {:.2}, {:.2})",
        rig.frame(),
        final_position.x,
        final_position.y,
        final_position.z
    );

    ExitCode::SUCCESS
}
