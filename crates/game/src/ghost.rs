//! Ghost runs: recording a player's run and replaying the best one.
//!
//! While a run is in progress the player's position, camera angles and held
//! buttons are sampled at a fixed interval. A finished run replaces the
//! level's stored best only when it is faster. Playback walks the stored
//! samples, easing toward each one over a sample interval, and loops.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strafe_physics::CommandButtons;

/// Seconds between recorded samples.
pub const SAMPLE_INTERVAL: f32 = 0.05;

/// Recording stops growing past this many samples (about 20 minutes).
pub const MAX_SAMPLES: usize = 25_000;

/// One recorded moment of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GhostSample {
    /// Box center.
    pub position: Vec3,
    /// Camera yaw in radians.
    pub yaw: f32,
    /// Camera pitch in radians.
    pub pitch: f32,
    /// Buttons held when sampled.
    pub buttons: CommandButtons,
}

/// Samples the current run at [`SAMPLE_INTERVAL`].
#[derive(Debug, Clone, Default)]
pub struct GhostRecorder {
    timer: f32,
    samples: Vec<GhostSample>,
}

impl GhostRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throw away the current recording.
    pub fn restart(&mut self) {
        self.timer = 0.0;
        self.samples.clear();
    }

    /// Advance the sample timer and store `sample` once an interval has
    /// passed. Returns whether the sample was stored.
    pub fn record(&mut self, delta_time: f32, sample: GhostSample) -> bool {
        self.timer += delta_time;

        if self.timer > SAMPLE_INTERVAL && !self.is_full() {
            self.timer = 0.0;
            self.samples.push(sample);
            return true;
        }

        false
    }

    /// Samples recorded so far.
    pub fn samples(&self) -> &[GhostSample] {
        &self.samples
    }

    /// Whether the recording hit [`MAX_SAMPLES`].
    pub fn is_full(&self) -> bool {
        self.samples.len() >= MAX_SAMPLES
    }

    /// Hand the recording over as a completed run, leaving the recorder empty.
    pub fn finish(&mut self, completion_time: f32) -> GhostRun {
        self.timer = 0.0;
        GhostRun {
            completion_time,
            samples: std::mem::take(&mut self.samples),
        }
    }
}

/// A completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostRun {
    /// Seconds from start to finish. Zero means no time was recorded.
    pub completion_time: f32,
    pub samples: Vec<GhostSample>,
}

impl GhostRun {
    /// Whether this run should replace `best`.
    ///
    /// Anything beats no run, and anything beats a run without a time.
    pub fn beats(&self, best: Option<&GhostRun>) -> bool {
        match best {
            None => true,
            Some(best) => best.completion_time == 0.0 || best.completion_time > self.completion_time,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Store `run` in `best` if it is faster. Returns whether it was kept.
pub fn keep_if_faster(best: &mut Option<GhostRun>, run: GhostRun) -> bool {
    if !run.beats(best.as_ref()) {
        return false;
    }

    log::info!(
        "new best run: {:.2}s ({} samples)",
        run.completion_time,
        run.samples.len()
    );
    *best = Some(run);
    true
}

/// Where a replayed ghost is drawn this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostPose {
    pub position: Vec3,
    /// Ghosts only turn about the vertical axis.
    pub yaw: f32,
    pub buttons: CommandButtons,
}

/// Replays a [`GhostRun`] in a loop.
#[derive(Debug, Clone, Default)]
pub struct GhostPlayback {
    index: usize,
    timer: f32,
    pose: Option<GhostPose>,
}

impl GhostPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start again from the first sample.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Index of the sample the ghost is heading toward.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Advance playback by `delta_time` and return the new pose.
    ///
    /// The pose eases from where it was toward the current sample, by the
    /// share of the sample interval elapsed. Returns `None` for an empty run.
    pub fn update(&mut self, run: &GhostRun, delta_time: f32) -> Option<GhostPose> {
        if run.samples.is_empty() {
            return None;
        }

        if self.index >= run.samples.len() - 1 {
            self.index = 0;
        }

        let target = run.samples[self.index];
        let t = (self.timer / SAMPLE_INTERVAL).clamp(0.0, 1.0);
        let current = self.pose.unwrap_or(GhostPose {
            position: target.position,
            yaw: target.yaw,
            buttons: target.buttons,
        });

        let pose = GhostPose {
            position: current.position.lerp(target.position, t),
            yaw: current.yaw + (target.yaw - current.yaw) * t,
            buttons: target.buttons,
        };
        self.pose = Some(pose);

        self.timer += delta_time;
        if self.timer >= SAMPLE_INTERVAL {
            self.index += 1;
            self.timer = 0.0;
        }

        Some(pose)
    }
}
