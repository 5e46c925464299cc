/// Tunable scene parameters
///
/// Every numeric constant of the interaction and choreography pipeline lives
/// here. Shells may deserialize a [`SceneConfig`] from TOML or JSON; missing
/// fields fall back to the defaults.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for the particle layouts
    pub seed: u64,
    /// Consecutive repeats needed before a raw gesture is confirmed
    pub stability_threshold: u32,
    pub controls: ControlConfig,
    pub solid: SolidConfig,
    pub ambient: AmbientConfig,
    pub photo: PhotoConfig,
    pub redirect: RedirectConfig,
}

/// Mapping from hand geometry to rotation and zoom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub rotation_sensitivity: f32,
    /// Pitch sensitivity as a fraction of yaw sensitivity
    pub pitch_factor: f32,
    /// Per-tick approach rate for rotation and camera distance
    pub smoothing: f32,
    pub camera_min_distance: f32,
    pub camera_max_distance: f32,
    pub camera_default_distance: f32,
    /// Wrist to middle-MCP span of a far hand (normalized image units)
    pub hand_size_min: f32,
    /// Span of a near hand
    pub hand_size_max: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolidConfig {
    /// Seconds the body stays transparent after a reassembly flip
    pub hold_window: f32,
    pub hold_rate: f32,
    pub fade_in_rate: f32,
    pub fade_out_rate: f32,
    pub snap_tolerance: f32,
    pub hidden_epsilon: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub count: usize,
    pub particle_size: f32,
    pub ring_inner: f32,
    pub ring_outer: f32,
    pub ring_thickness: f32,
    /// Fraction of particles placed on the inner hub wall
    pub hub_fraction: f32,
    pub explosion_radius: f32,
    pub explode_rate: f32,
    pub assemble_rate: f32,
    /// Progress below which an exploding particle is invisible
    pub appear_start: f32,
    /// Progress at which an exploding particle reaches full scale
    pub scale_ramp_end: f32,
    /// Progress below which a reassembling particle is invisible
    pub vanish_end: f32,
    /// Progress below which a reassembling particle stops moving and shrinks
    pub absorb_end: f32,
    pub max_spin_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    pub count: usize,
    pub ring_inner: f32,
    pub ring_outer: f32,
    pub ring_thickness: f32,
    /// Edge length of the cube the exploded photos are scattered in
    pub scatter_range: f32,
    pub max_tilt: f32,
    pub initial_scale: f32,
    pub assembled_scale: f32,
    pub exploded_scale: f32,
    pub explode_rate: f32,
    pub assemble_rate: f32,
    pub arrival_threshold: f32,
    /// Per-tick approach rate for material colors
    pub color_rate: f32,
    pub glow_intensity: f32,
    pub arrived_roughness: f32,
    pub glow_roughness: f32,
    pub glow_color: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    pub delay_ms: u64,
    pub destination: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_d15c,
            stability_threshold: 2,
            controls: ControlConfig::default(),
            solid: SolidConfig::default(),
            ambient: AmbientConfig::default(),
            photo: PhotoConfig::default(),
            redirect: RedirectConfig::default(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            rotation_sensitivity: 3.0,
            pitch_factor: 0.6,
            smoothing: 0.1,
            camera_min_distance: 10.0,
            camera_max_distance: 45.0,
            camera_default_distance: 24.0,
            hand_size_min: 0.05,
            hand_size_max: 0.35,
        }
    }
}

impl Default for SolidConfig {
    fn default() -> Self {
        Self {
            hold_window: 1.5,
            hold_rate: 20.0,
            fade_in_rate: 1.5,
            fade_out_rate: 10.0,
            snap_tolerance: 0.01,
            hidden_epsilon: 0.02,
        }
    }
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            particle_size: 0.06,
            ring_inner: 2.2,
            ring_outer: 3.5,
            ring_thickness: 1.0,
            hub_fraction: 0.2,
            explosion_radius: 25.0,
            explode_rate: 1.2,
            assemble_rate: 1.5,
            appear_start: 0.01,
            scale_ramp_end: 0.2,
            vanish_end: 0.02,
            absorb_end: 0.15,
            max_spin_speed: 0.05,
        }
    }
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            count: 30,
            ring_inner: 2.0,
            ring_outer: 3.5,
            ring_thickness: 0.5,
            scatter_range: 22.0,
            max_tilt: 0.5,
            initial_scale: 0.01,
            assembled_scale: 0.05,
            exploded_scale: 1.5,
            explode_rate: 2.0,
            assemble_rate: 3.0,
            arrival_threshold: 0.8,
            color_rate: 0.1,
            glow_intensity: 2.0,
            arrived_roughness: 0.4,
            glow_roughness: 1.0,
            // #8ab4f8
            glow_color: [0x8a as f32 / 255.0, 0xb4 as f32 / 255.0, 0xf8 as f32 / 255.0],
        }
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            destination: "https://temp-predict-campare.vercel.app/".to_string(),
        }
    }
}

impl SceneConfig {
    /// Reject settings that would break the clamping or phase invariants.
    pub fn validate(&self) -> Result<(), String> {
        let c = &self.controls;
        if c.camera_min_distance <= 0.0 || c.camera_min_distance >= c.camera_max_distance {
            return Err(format!(
                "camera distance range [{}, {}] is empty",
                c.camera_min_distance, c.camera_max_distance
            ));
        }
        if c.hand_size_min >= c.hand_size_max {
            return Err(format!(
                "hand size range [{}, {}] is empty",
                c.hand_size_min, c.hand_size_max
            ));
        }
        if !(0.0..=1.0).contains(&c.smoothing) {
            return Err(format!("smoothing {} must lie in [0, 1]", c.smoothing));
        }

        let rates = [
            ("solid.hold_rate", self.solid.hold_rate),
            ("solid.fade_in_rate", self.solid.fade_in_rate),
            ("solid.fade_out_rate", self.solid.fade_out_rate),
            ("ambient.explode_rate", self.ambient.explode_rate),
            ("ambient.assemble_rate", self.ambient.assemble_rate),
            ("photo.explode_rate", self.photo.explode_rate),
            ("photo.assemble_rate", self.photo.assemble_rate),
            ("photo.color_rate", self.photo.color_rate),
        ];
        if let Some((name, rate)) = rates.iter().find(|(_, rate)| *rate <= 0.0) {
            return Err(format!("{} must be positive, got {}", name, rate));
        }

        let a = &self.ambient;
        if !(a.appear_start < a.scale_ramp_end && a.scale_ramp_end <= 1.0) {
            return Err("ambient explode phases must satisfy appear_start < scale_ramp_end <= 1".to_string());
        }
        if !(a.vanish_end < a.absorb_end && a.absorb_end < 1.0) {
            return Err("ambient reassembly phases must satisfy vanish_end < absorb_end < 1".to_string());
        }
        if a.ring_inner > a.ring_outer || self.photo.ring_inner > self.photo.ring_outer {
            return Err("ring inner radius exceeds outer radius".to_string());
        }
        if self.solid.hidden_epsilon < 0.0 || self.solid.hold_window < 0.0 {
            return Err("solid hold window and hidden epsilon must not be negative".to_string());
        }
        Ok(())
    }
}
