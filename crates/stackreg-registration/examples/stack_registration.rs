//! Stack Registration Example
//!
//! This example registers a synthetic time-lapse of a drifting, slowly
//! rotating object and removes the drift:
//!
//! 1. Build a 3D stack of frames along axis 0
//! 2. Register each frame to its predecessor (rigid body)
//! 3. Print the cumulative matrices
//! 4. Apply them to the raw stack and report the residual
//!
//! Usage:
//!   cargo run --example stack_registration

use std::sync::Arc;

use burn::tensor::TensorData;
use burn_ndarray::NdArray;
use stackreg_core::image::to_host;
use stackreg_core::{ImageStack, TransformFamily};
use stackreg_registration::{
    ConsoleProgressCallback, MomentEngine, ProgressTracker, ReferenceMode, StackReg, StackRegConfig,
};

type Backend = NdArray<f32>;

const SIZE: usize = 96;
const FRAMES: usize = 8;

/// Elongated Gaussian centred at `(cx, cy)` with its long axis at `angle`.
fn frame(cx: f64, cy: f64, angle: f64) -> Vec<f32> {
    let (s, c) = angle.sin_cos();
    let mut values = Vec::with_capacity(SIZE * SIZE);
    for row in 0..SIZE {
        for col in 0..SIZE {
            let (dx, dy) = (col as f64 - cx, row as f64 - cy);
            let u = c * dx + s * dy;
            let v = -s * dx + c * dy;
            values.push((-(u * u) / 128.0 - (v * v) / 18.0).exp() as f32);
        }
    }
    values
}

fn main() -> anyhow::Result<()> {
    println!("Stack Registration Example");
    println!("==========================\n");

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let device = Default::default();

    // =======================================================================
    // Step 1: Synthesize a drifting stack
    // =======================================================================
    println!("Step 1: Building {FRAMES} frames of {SIZE}x{SIZE}...");
    let mut data = Vec::with_capacity(FRAMES * SIZE * SIZE);
    for t in 0..FRAMES {
        let t = t as f64;
        data.extend(frame(44.0 + 1.5 * t, 50.0 - 0.75 * t, 0.05 * t));
    }
    let stack = ImageStack::<Backend>::try_from_data(TensorData::new(data, [FRAMES, SIZE, SIZE]), &device)?;
    println!("  Stack shape: {:?}", stack.dims());

    // =======================================================================
    // Step 2: Register
    // =======================================================================
    println!("\nStep 2: Registering (rigid body, previous frame)...");
    let progress = ProgressTracker::new().with_callback(Arc::new(ConsoleProgressCallback::new(2)));
    let mut sr = StackReg::new(TransformFamily::RigidBody, MomentEngine::new()).with_progress(progress);
    let config = StackRegConfig::new().with_reference(ReferenceMode::Previous);
    let tmats = sr.register_stack(&stack, &config)?;

    // =======================================================================
    // Step 3: Report
    // =======================================================================
    println!("\nStep 3: Cumulative matrices");
    for (i, m) in tmats.iter().enumerate() {
        let angle = m[(1, 0)].atan2(m[(0, 0)]);
        println!(
            "  frame {i}: angle {:+.4} rad, shift ({:+.3}, {:+.3})",
            angle,
            m[(0, 2)],
            m[(1, 2)]
        );
    }

    // =======================================================================
    // Step 4: Apply
    // =======================================================================
    println!("\nStep 4: Transforming raw stack...");
    let aligned = sr.transform_stack(&stack, config.axis, None)?;
    let reference = to_host(&aligned.frame(0, 0)?)?;
    for i in 1..FRAMES {
        let current = to_host(&aligned.frame(0, i)?)?;
        let rms = (current
            .iter()
            .zip(&reference)
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            / reference.len() as f64)
            .sqrt();
        println!("  frame {i}: RMS difference to frame 0 = {rms:.5}");
    }

    println!("\nDone.");
    Ok(())
}
