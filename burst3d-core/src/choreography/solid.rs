/// Solid body fade
///
/// The body vanishes quickly on explosion. On reassembly it stays fully
/// transparent through the hold window while the swarm flies home, then fades
/// back in slowly.
use crate::config::SolidConfig;
use crate::smoothing::approach;

use super::timer::LayerTimer;

#[derive(Debug, Clone, PartialEq)]
pub struct SolidState {
    pub opacity: f32,
    timer: LayerTimer,
}

/// Render description of the solid body for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidFrame {
    pub opacity: f32,
    pub visible: bool,
    /// Hidden bodies must not occlude the particles behind them
    pub depth_write: bool,
}

impl SolidState {
    pub fn new(exploded: bool) -> Self {
        Self {
            opacity: if exploded { 0.0 } else { 1.0 },
            timer: LayerTimer::settled(exploded),
        }
    }

    pub fn advance(&mut self, exploded: bool, dt: f32, config: &SolidConfig) {
        let since_flip = self.timer.advance(exploded, dt);

        let (target, rate) = if exploded {
            (0.0, config.fade_out_rate)
        } else if since_flip < config.hold_window {
            (0.0, config.hold_rate)
        } else {
            (1.0, config.fade_in_rate)
        };

        let mut opacity = approach(self.opacity, target, rate, dt);
        if (opacity - target).abs() < config.snap_tolerance {
            opacity = target;
        }
        self.opacity = opacity;
    }

    pub fn frame(&self, config: &SolidConfig) -> SolidFrame {
        let hidden = self.opacity <= config.hidden_epsilon;
        SolidFrame {
            opacity: self.opacity,
            visible: !hidden,
            depth_write: !hidden,
        }
    }
}
