/// Time elapsed since a layer's target last flipped
#[derive(Debug, Clone, PartialEq)]
pub struct LayerTimer {
    target: bool,
    since_flip: f32,
}

impl LayerTimer {
    /// A timer that has been resting on `target` for as long as anyone cares
    pub fn settled(target: bool) -> Self {
        Self {
            target,
            since_flip: f32::INFINITY,
        }
    }

    /// Advance by `dt`, restarting from zero first if `target` flipped.
    /// Returns the seconds spent on the current target, this step included.
    pub fn advance(&mut self, target: bool, dt: f32) -> f32 {
        if target != self.target {
            self.target = target;
            self.since_flip = 0.0;
        }
        self.since_flip += dt;
        self.since_flip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_resets() {
        let mut timer = LayerTimer::settled(false);
        assert!(timer.advance(false, 0.1).is_infinite());
        assert!((timer.advance(true, 0.1) - 0.1).abs() < 1e-6);
        assert!((timer.advance(true, 0.25) - 0.35).abs() < 1e-6);
        assert!((timer.advance(false, 0.05) - 0.05).abs() < 1e-6);
    }
}
