//! CorePlugin wires the scaled simulation clock the behavioral systems tick from.

use std::time::Duration;

use bevy::prelude::*;

/// Lowest multiplier the clock accepts; zero would stall every behavior timer.
const MIN_SCALE: f32 = 0.001;

/// Frame clock with a global speed multiplier.
///
/// Roam decisions, chatter delays, and speech-bubble lifetimes all tick from
/// [`SimulationClock::scaled_delta`], so the whole behavioral layer speeds up
/// or slows down with one knob. Rendering and camera motion stay on real time.
#[derive(Resource)]
pub struct SimulationClock {
    scale: f32,
    frame_delta: Duration,
    elapsed: Duration,
}

impl SimulationClock {
    pub fn new(scale: f32) -> Self {
        Self {
            scale: scale.max(MIN_SCALE),
            frame_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.scale = scale.max(MIN_SCALE);
    }

    pub fn time_scale(&self) -> f32 {
        self.scale
    }

    /// Scaled delta of the most recent frame.
    pub fn scaled_delta(&self) -> Duration {
        self.frame_delta
    }

    /// Scaled delta of the most recent frame, in seconds.
    pub fn scaled_delta_secs(&self) -> f32 {
        self.frame_delta.as_secs_f32()
    }

    /// Total scaled time accumulated since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Applies a real frame delta, scaling and accumulating it.
    pub fn tick(&mut self, real_delta: Duration) {
        self.frame_delta = real_delta.mul_f32(self.scale);
        self.elapsed += self.frame_delta;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Installs the [`SimulationClock`] and keeps it ticking every frame.
pub struct CorePlugin {
    pub time_scale: f32,
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self { time_scale: 1.0 }
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationClock::new(self.time_scale))
            .add_systems(Startup, report_time_scale)
            .add_systems(Update, tick_simulation_clock);
    }
}

fn report_time_scale(clock: Res<SimulationClock>) {
    info!("simulation clock running at {:.3}x", clock.time_scale());
}

fn tick_simulation_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_and_elapsed_follow_the_multiplier() {
        let mut clock = SimulationClock::new(4.0);
        clock.tick(Duration::from_millis(500));
        assert_eq!(clock.scaled_delta(), Duration::from_secs(2));
        clock.tick(Duration::from_millis(250));
        assert_eq!(clock.scaled_delta(), Duration::from_secs(1));
        assert_eq!(clock.elapsed(), Duration::from_secs(3));
    }

    #[test]
    fn scale_is_clamped_away_from_zero() {
        let mut clock = SimulationClock::new(0.0);
        assert!(clock.time_scale() >= MIN_SCALE);
        clock.set_time_scale(-2.0);
        assert!(clock.time_scale() >= MIN_SCALE);
    }
}
