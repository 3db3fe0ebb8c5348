//! Python bindings for the pool-core ball motion model.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from pool_physics import Simulation
//!
//! sim = Simulation(cloth="worsted")
//! cue_ball = sim.add_ball(-0.6, 0.0)
//! sim.strike(cue_ball, forward_angle=3.1416, cue_speed=0.4, b=0.01)
//!
//! while not sim.is_settled():
//!     sim.advance(1.0 / 60.0)
//!     pos = sim.ball_position(cue_ball)
//!     print(f"Ball at ({pos.x:.3f}, {pos.y:.3f}) {sim.ball_phase(cue_ball)}")
//! ```

use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

use pool_core::materials::{MaterialError, MaterialLoader};
use pool_core::simulation::{
    MaterialPresets, Simulation as CoreSimulation, SimulationConfig, CONFIG_ENV,
};
use pool_core::strike::MIN_ELEVATION;
use pool_core::types::{MotionPhase, Vec3 as CoreVec3};
use pool_core::PhysicsError;

/// 3D vector for positions, velocities, etc.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec3 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
    #[pyo3(get, set)]
    pub z: f64,
}

#[pymethods]
impl Vec3 {
    #[new]
    fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn __repr__(&self) -> String {
        format!("Vec3({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }

    fn magnitude(&self) -> f64 {
        CoreVec3::from(*self).magnitude()
    }

    fn to_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

impl From<CoreVec3> for Vec3 {
    fn from(v: CoreVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3> for CoreVec3 {
    fn from(v: Vec3) -> Self {
        CoreVec3::new(v.x, v.y, v.z)
    }
}

fn to_value_err(err: MaterialError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn to_py_err(err: PhysicsError) -> PyErr {
    match err {
        PhysicsError::BallOutOfBounds { .. } => PyIndexError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn phase_name(phase: MotionPhase) -> &'static str {
    match phase {
        MotionPhase::Still => "still",
        MotionPhase::Sliding => "sliding",
        MotionPhase::Rolling => "rolling",
    }
}

/// Main simulation class.
///
/// Owns the balls on one table and drives them at a fixed rate.
#[pyclass]
pub struct Simulation {
    inner: CoreSimulation,
}

#[pymethods]
impl Simulation {
    /// Create a simulation.
    ///
    /// With `config_path` the YAML file is loaded and any error is raised;
    /// otherwise the file named by `POOL_SIM_CONFIG` (or
    /// `config/simulation.yaml`) is used when present. `ball`, `cloth` and
    /// `cue` name presets under `materials_dir` that replace the configured
    /// ones.
    #[new]
    #[pyo3(signature = (config_path=None, ball=None, cloth=None, cue=None, materials_dir="materials".to_string()))]
    fn new(
        config_path: Option<String>,
        ball: Option<String>,
        cloth: Option<String>,
        cue: Option<String>,
        materials_dir: String,
    ) -> PyResult<Self> {
        let mut config = match config_path {
            Some(path) => SimulationConfig::load_from(path).map_err(to_value_err)?,
            None => SimulationConfig::load(),
        };

        let presets = MaterialPresets {
            dir: None,
            ball,
            cloth,
            cue,
        };
        if !presets.is_empty() {
            config = config.with_presets(presets);
            config
                .apply_presets(&MaterialLoader::new(materials_dir))
                .map_err(to_value_err)?;
        }

        let inner = CoreSimulation::new(config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Preset names of one kind ("balls", "cloths" or "cues").
    #[staticmethod]
    #[pyo3(signature = (kind, materials_dir="materials".to_string()))]
    fn presets(kind: String, materials_dir: String) -> PyResult<Vec<String>> {
        let loader = MaterialLoader::new(materials_dir);
        let names = match kind.as_str() {
            "balls" => loader.list_balls(),
            "cloths" => loader.list_cloths(),
            "cues" => loader.list_cues(),
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown preset kind {:?}, expected balls, cloths or cues",
                    other
                )));
            }
        };
        names.map_err(to_value_err)
    }

    /// Environment variable read for the default config path.
    #[staticmethod]
    fn config_env() -> &'static str {
        CONFIG_ENV
    }

    /// Current simulation time in seconds.
    #[getter]
    fn time(&self) -> f64 {
        self.inner.time()
    }

    /// Fixed tick length in seconds.
    #[getter]
    fn timestep(&self) -> f64 {
        self.inner.config().timestep
    }

    /// Table extents as (min_x, max_x, min_y, max_y).
    fn table_bounds(&self) -> (f64, f64, f64, f64) {
        let t = self.inner.config().table;
        (t.min_x, t.max_x, t.min_y, t.max_y)
    }

    /// Place a ball at rest on the cloth. Returns its index.
    fn add_ball(&mut self, x: f64, y: f64) -> PyResult<usize> {
        self.inner
            .add_ball(CoreVec3::new(x, y, 0.0))
            .map_err(to_py_err)
    }

    fn ball_count(&self) -> usize {
        self.inner.balls().len()
    }

    /// Strike a ball with the configured cue.
    ///
    /// `a`, `b` are the lateral and vertical contact offsets (m) and
    /// `elevation` the cue angle above the cloth (rad). Returns the impulse
    /// magnitude (N·s).
    #[pyo3(signature = (index, forward_angle, cue_speed, a=0.0, b=0.0, elevation=MIN_ELEVATION))]
    fn strike(
        &mut self,
        index: usize,
        forward_angle: f64,
        cue_speed: f64,
        a: f64,
        b: f64,
        elevation: f64,
    ) -> PyResult<f64> {
        let input = self
            .inner
            .strike_input(forward_angle, cue_speed)
            .with_offset(a, b)
            .with_elevation(elevation);
        let outcome = self.inner.strike(index, &input).map_err(to_py_err)?;
        Ok(outcome.force)
    }

    /// Feed one frame of wall-clock time. Returns the number of ticks run.
    fn advance(&mut self, frame_dt: f64) -> PyResult<u32> {
        self.inner.advance(frame_dt).map_err(to_py_err)
    }

    /// Run `steps` fixed ticks directly.
    fn step_n(&mut self, steps: usize) -> PyResult<()> {
        for _ in 0..steps {
            self.inner.tick().map_err(to_py_err)?;
        }
        Ok(())
    }

    fn ball_position(&self, index: usize) -> PyResult<Vec3> {
        Ok(self.inner.ball(index).map_err(to_py_err)?.position().into())
    }

    fn ball_velocity(&self, index: usize) -> PyResult<Vec3> {
        Ok(self.inner.ball(index).map_err(to_py_err)?.velocity().into())
    }

    /// Angular velocity in rad/s.
    fn ball_spin(&self, index: usize) -> PyResult<Vec3> {
        Ok(self
            .inner
            .ball(index)
            .map_err(to_py_err)?
            .angular_velocity()
            .into())
    }

    /// "sliding", "rolling" or "still".
    fn ball_phase(&self, index: usize) -> PyResult<&'static str> {
        Ok(phase_name(self.inner.ball(index).map_err(to_py_err)?.phase()))
    }

    /// Predicted resting place of a ball, barring contacts.
    fn ball_rest_position(&self, index: usize) -> PyResult<Vec3> {
        Ok(self
            .inner
            .ball(index)
            .map_err(to_py_err)?
            .rest_position()
            .into())
    }

    /// Cushion and ball contacts from the last `advance`, as
    /// `(ball, target, reflected)` tuples.
    fn last_contacts(&self) -> Vec<(usize, String, bool)> {
        self.inner
            .events()
            .iter()
            .map(|e| (e.ball, format!("{:?}", e.contact.target), e.reflected))
            .collect()
    }

    fn is_settled(&self) -> bool {
        self.inner.is_settled()
    }

    /// Stop every ball where it is and rewind the clock.
    fn reset(&mut self) {
        self.inner.reset();
    }
}

/// Python module definition.
#[pymodule]
fn pool_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec3>()?;
    m.add_class::<Simulation>()?;
    Ok(())
}
