/// Burst3D Web - WASM bindings for a browser host
///
/// The host page owns webcam capture, the hand tracker, and the three.js
/// scene. Each animation frame it pushes the latest landmarks in, calls
/// `tick`, and copies the flat per-layer buffers into its instanced meshes.
use burst3d_core::choreography::PhotoState;
use burst3d_core::{Engine, FrameSnapshot, LandmarkSample, Navigator, RotationState, SceneConfig, Transform};
use nalgebra::{Matrix4, Point3, Vector3};
use wasm_bindgen::prelude::*;

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

/// Floats per instance matrix (column-major, three.js `Matrix4.fromArray` order)
pub const MATRIX_STRIDE: usize = 16;
/// Floats per photo material: color rgb, emissive rgb, intensity, roughness, texture flag
pub const MATERIAL_STRIDE: usize = 9;

/// Sends the page to the redirect destination
#[derive(Debug, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&mut self, destination: &str) {
        let Some(window) = web_sys::window() else {
            web_sys::console::error_1(&"no window to navigate".into());
            return;
        };
        if let Err(err) = window.location().set_href(destination) {
            web_sys::console::error_2(&"navigation failed".into(), &err);
        }
    }
}

/// Parse and validate a JSON scene config; missing fields take defaults.
pub fn parse_config(json: &str) -> Result<SceneConfig, String> {
    let config: SceneConfig = serde_json::from_str(json).map_err(|e| format!("invalid config: {}", e))?;
    config.validate()?;
    Ok(config)
}

/// Append one instance matrix per pose, column-major.
pub fn flatten_matrices<'a>(poses: impl Iterator<Item = (&'a Point3<f32>, &'a Vector3<f32>, f32)>) -> Vec<f32> {
    let mut out = Vec::new();
    for (position, rotation, scale) in poses {
        let matrix: Matrix4<f32> = Transform::instance_matrix(position, &RotationState::from(*rotation), scale);
        out.extend_from_slice(matrix.as_slice());
    }
    out
}

pub fn material_buffer(photos: &[PhotoState]) -> Vec<f32> {
    let mut out = Vec::with_capacity(photos.len() * MATERIAL_STRIDE);
    for photo in photos {
        out.extend_from_slice(photo.color.as_slice());
        out.extend_from_slice(photo.emissive.as_slice());
        out.push(photo.emissive_intensity);
        out.push(photo.roughness);
        out.push(if photo.texture_visible { 1.0 } else { 0.0 });
    }
    out
}

/// An interaction session bound to the page
#[wasm_bindgen]
pub struct WebEngine {
    engine: Engine,
    navigator: LocationNavigator,
    snapshot: FrameSnapshot,
}

impl WebEngine {
    fn from_config(config: SceneConfig) -> Self {
        let mut engine = Engine::new(config);
        let mut navigator = LocationNavigator;
        let snapshot = engine.tick(0.0, &mut navigator);
        Self {
            engine,
            navigator,
            snapshot,
        }
    }
}

#[wasm_bindgen]
impl WebEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> WebEngine {
        let config = SceneConfig {
            seed: u64::from(seed),
            ..SceneConfig::default()
        };
        console_log!(
            "burst3d: {} ambient / {} photo particles",
            config.ambient.count,
            config.photo.count
        );
        Self::from_config(config)
    }

    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<WebEngine, JsValue> {
        let config = parse_config(json).map_err(|e| JsValue::from_str(&e))?;
        Ok(Self::from_config(config))
    }

    /// Latest tracker output as flat `x, y` pairs; an empty array means no hand.
    #[wasm_bindgen(js_name = submitLandmarks)]
    pub fn submit_landmarks(&mut self, data: &[f32]) {
        if data.is_empty() {
            self.engine.submit(None);
            return;
        }
        if data.len() % 2 != 0 {
            web_sys::console::warn_1(&format!("odd landmark buffer length {}", data.len()).into());
        }
        let sample = LandmarkSample::from_flat(data);
        self.engine.submit(Some(&sample));
    }

    /// Advance by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.snapshot = self.engine.tick(dt, &mut self.navigator);
        for event in &self.snapshot.events {
            console_log!("burst3d: {:?}", event);
        }
    }

    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.snapshot.state).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn gesture(&self) -> String {
        self.snapshot.state.gesture.label().to_string()
    }

    #[wasm_bindgen(js_name = visualMode)]
    pub fn visual_mode(&self) -> String {
        self.snapshot.state.visual_mode().to_string()
    }

    #[wasm_bindgen(js_name = isExploded)]
    pub fn is_exploded(&self) -> bool {
        self.snapshot.state.is_exploded
    }

    #[wasm_bindgen(js_name = isRedirecting)]
    pub fn is_redirecting(&self) -> bool {
        self.snapshot.state.is_redirecting
    }

    #[wasm_bindgen(js_name = redirectProgress)]
    pub fn redirect_progress(&self) -> f32 {
        self.snapshot.redirect_progress
    }

    /// Model group rotation `[x, y, z]`
    #[wasm_bindgen(js_name = rigRotation)]
    pub fn rig_rotation(&self) -> js_sys::Float32Array {
        let r = self.snapshot.rig.rotation;
        js_sys::Float32Array::from(&[r.x, r.y, r.z][..])
    }

    #[wasm_bindgen(js_name = cameraDistance)]
    pub fn camera_distance(&self) -> f32 {
        self.snapshot.rig.camera_distance
    }

    #[wasm_bindgen(js_name = solidOpacity)]
    pub fn solid_opacity(&self) -> f32 {
        self.snapshot.layers.solid.opacity
    }

    /// Also the depth-write flag for the solid material
    #[wasm_bindgen(js_name = solidVisible)]
    pub fn solid_visible(&self) -> bool {
        self.snapshot.layers.solid.visible
    }

    #[wasm_bindgen(js_name = ambientMatrices)]
    pub fn ambient_matrices(&self) -> js_sys::Float32Array {
        let data = flatten_matrices(
            self.snapshot
                .layers
                .ambient
                .iter()
                .map(|p| (&p.position, &p.rotation, p.scale)),
        );
        js_sys::Float32Array::from(data.as_slice())
    }

    #[wasm_bindgen(js_name = photoMatrices)]
    pub fn photo_matrices(&self) -> js_sys::Float32Array {
        let data = flatten_matrices(
            self.snapshot
                .layers
                .photos
                .iter()
                .map(|p| (&p.position, &p.rotation, p.scale)),
        );
        js_sys::Float32Array::from(data.as_slice())
    }

    #[wasm_bindgen(js_name = photoMaterials)]
    pub fn photo_materials(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(material_buffer(&self.snapshot.layers.photos).as_slice())
    }

    /// Tear down; a pending redirect never fires afterward.
    pub fn dispose(&mut self) {
        self.engine.dispose();
    }
}

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
