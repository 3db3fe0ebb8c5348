//! Fixed-step driver for a table of balls.
//!
//! Each frame hands its wall-clock delta to [`Simulation::advance`], which
//! buffers it in a [`FixedTimestep`] and runs whole ticks. A tick:
//!
//! 1. steps every ball by the fixed `dt`
//! 2. detects cushion and ball contacts from the new positions
//! 3. resolves the contacts
//!
//! Once every ball is still, any buffered time is dropped.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::collision::ContactDetector;
use crate::error::PhysicsError;
use crate::friction::FrictionModel;
use crate::materials::{read_yaml, MaterialError, MaterialLoader};
use crate::model::{BallMotionModel, EvaluationMode};
use crate::strike::{StrikeInput, StrikeOutcome};
use crate::time::FixedTimestep;
use crate::types::{
    constants, BallProperties, ClothProperties, ContactInfo, ContactTarget, CueProperties,
    TableBounds, Vec3,
};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "POOL_SIM_CONFIG";
/// Config file used when `POOL_SIM_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/simulation.yaml";
/// Preset directory used when a config names presets without a `dir`,
/// relative to the config file.
pub const DEFAULT_MATERIALS_DIR: &str = "../materials";

/// Named material presets, resolved through a [`MaterialLoader`].
///
/// A named preset replaces the matching inline `ball`, `cloth` or `cue`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialPresets {
    /// Directory holding `balls/`, `cloths/` and `cues/`
    pub dir: Option<PathBuf>,
    pub ball: Option<String>,
    pub cloth: Option<String>,
    pub cue: Option<String>,
}

impl MaterialPresets {
    pub fn is_empty(&self) -> bool {
        self.ball.is_none() && self.cloth.is_none() && self.cue.is_none()
    }
}

/// Driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed tick length (s).
    pub timestep: f64,
    /// Most ticks one frame may run.
    pub max_ticks_per_frame: u32,
    pub mode: EvaluationMode,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
    pub table: TableBounds,
    pub ball: BallProperties,
    pub cloth: ClothProperties,
    pub cue: CueProperties,
    pub presets: MaterialPresets,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 120.0,
            max_ticks_per_frame: 10,
            mode: EvaluationMode::Integrated,
            gravity: constants::GRAVITY,
            table: TableBounds::nine_foot(),
            ball: BallProperties::regulation(),
            cloth: ClothProperties::standard(),
            cue: CueProperties::house(),
            presets: MaterialPresets::default(),
        }
    }
}

impl SimulationConfig {
    /// Load from `$POOL_SIM_CONFIG` or `config/simulation.yaml`, falling
    /// back to defaults.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            tracing::debug!(path, "no simulation config, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path, error = %e, "failed to load simulation config, using defaults");
                Self::default()
            }
        }
    }

    /// Load and validate a YAML config file.
    ///
    /// Named presets are read from `presets.dir`, or [`DEFAULT_MATERIALS_DIR`],
    /// relative to the file's directory.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, MaterialError> {
        let path = path.as_ref();
        let mut config: Self = read_yaml(path)?;
        if !config.presets.is_empty() {
            let dir = config
                .presets
                .dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MATERIALS_DIR));
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.apply_presets(&MaterialLoader::new(base.join(dir)))?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Replace the ball, cloth and cue with the presets named in `presets`.
    pub fn apply_presets(&mut self, loader: &MaterialLoader) -> Result<(), MaterialError> {
        if let Some(name) = &self.presets.ball {
            self.ball = loader.load_ball(name)?;
        }
        if let Some(name) = &self.presets.cloth {
            self.cloth = loader.load_cloth(name)?;
        }
        if let Some(name) = &self.presets.cue {
            self.cue = loader.load_cue(name)?;
        }
        tracing::debug!(
            ball = %self.ball.name,
            cloth = %self.cloth.name,
            cue = %self.cue.name,
            "material presets applied"
        );
        Ok(())
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(PhysicsError::InvalidTimeStep(self.timestep));
        }
        self.ball.validate()?;
        self.table.validate(self.ball.radius)?;
        self.friction()?;
        if !(self.cue.mass.is_finite() && self.cue.mass > 0.0) {
            return Err(PhysicsError::InvalidMass(self.cue.mass));
        }
        Ok(())
    }

    /// Friction law of the configured cloth under the configured gravity.
    pub fn friction(&self) -> Result<FrictionModel, PhysicsError> {
        let friction = FrictionModel::from_cloth(&self.cloth)?.with_gravity(self.gravity);
        friction.validate()?;
        Ok(friction)
    }

    pub fn with_timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_max_ticks_per_frame(mut self, max_ticks: u32) -> Self {
        self.max_ticks_per_frame = max_ticks;
        self
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_table(mut self, table: TableBounds) -> Self {
        self.table = table;
        self
    }

    pub fn with_ball(mut self, ball: BallProperties) -> Self {
        self.ball = ball;
        self
    }

    pub fn with_cloth(mut self, cloth: ClothProperties) -> Self {
        self.cloth = cloth;
        self
    }

    pub fn with_cue(mut self, cue: CueProperties) -> Self {
        self.cue = cue;
        self
    }

    pub fn with_presets(mut self, presets: MaterialPresets) -> Self {
        self.presets = presets;
        self
    }
}

/// A contact handled during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    /// Index of the ball that made contact
    pub ball: usize,
    pub contact: ContactInfo,
    /// Simulation time at the end of the tick (s)
    pub time: f64,
    /// Whether the ball's velocity was reflected
    pub reflected: bool,
}

/// A table of balls driven at a fixed rate.
pub struct Simulation {
    config: SimulationConfig,
    friction: FrictionModel,
    balls: Vec<BallMotionModel>,
    clock: FixedTimestep,
    time: f64,
    ticks: u64,
    events: Vec<ContactEvent>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        let friction = config.friction()?;
        let clock = FixedTimestep::new(config.timestep).with_max_steps(config.max_ticks_per_frame);

        Ok(Self {
            config,
            friction,
            balls: Vec::new(),
            clock,
            time: 0.0,
            ticks: 0,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Place a new ball at rest. Returns its index.
    pub fn add_ball(&mut self, position: Vec3) -> Result<usize, PhysicsError> {
        let ball = BallMotionModel::new(self.config.ball.clone(), self.friction, position)?
            .with_mode(self.config.mode);
        self.balls.push(ball);
        Ok(self.balls.len() - 1)
    }

    pub fn ball(&self, index: usize) -> Result<&BallMotionModel, PhysicsError> {
        let count = self.balls.len();
        self.balls
            .get(index)
            .ok_or(PhysicsError::BallOutOfBounds { index, count })
    }

    pub fn ball_mut(&mut self, index: usize) -> Result<&mut BallMotionModel, PhysicsError> {
        let count = self.balls.len();
        self.balls
            .get_mut(index)
            .ok_or(PhysicsError::BallOutOfBounds { index, count })
    }

    pub fn balls(&self) -> &[BallMotionModel] {
        &self.balls
    }

    /// Centre-ball strike input using the configured cue.
    pub fn strike_input(&self, forward_angle: f64, cue_speed: f64) -> StrikeInput {
        StrikeInput::new(forward_angle, cue_speed).with_cue(&self.config.cue)
    }

    /// Strike ball `index`.
    pub fn strike(
        &mut self,
        index: usize,
        input: &StrikeInput,
    ) -> Result<StrikeOutcome, PhysicsError> {
        self.ball_mut(index)?.strike(input)
    }

    /// Feed one frame's worth of time. Returns the number of ticks run.
    ///
    /// Contacts handled during the frame are available from [`Self::events`].
    pub fn advance(&mut self, frame_dt: f64) -> Result<u32, PhysicsError> {
        self.events.clear();
        let steps = self.clock.accumulate(frame_dt);
        for _ in 0..steps {
            let events = self.tick()?;
            self.events.extend(events);
        }
        if self.is_settled() {
            self.clock.reset();
        }
        Ok(steps)
    }

    /// Run exactly one fixed tick.
    pub fn tick(&mut self) -> Result<Vec<ContactEvent>, PhysicsError> {
        let dt = self.clock.dt();
        // A ball that stops this tick may still have crossed a cushion
        let moved: Vec<bool> = self.balls.iter().map(|ball| !ball.is_still()).collect();
        for ball in &mut self.balls {
            ball.step(dt)?;
        }
        self.time += dt;
        self.ticks += 1;

        let contacts = self.detect(&moved);
        let mut events = Vec::with_capacity(contacts.len());
        for (index, contact) in contacts {
            let reflected = self.resolve(index, &contact);
            events.push(ContactEvent {
                ball: index,
                contact,
                time: self.time,
                reflected,
            });
        }
        Ok(events)
    }

    /// Contacts of the balls that moved this tick, from the current positions.
    fn detect(&self, moved: &[bool]) -> Vec<(usize, ContactInfo)> {
        let mut contacts = Vec::new();
        let radius = self.config.ball.radius;

        for (i, ball) in self.balls.iter().enumerate() {
            if !moved[i] {
                continue;
            }
            let found =
                ContactDetector::cushion_contacts(&ball.position(), radius, &self.config.table);
            contacts.extend(found.into_iter().map(|contact| (i, contact)));
        }

        for i in 0..self.balls.len() {
            for j in (i + 1)..self.balls.len() {
                if !(moved[i] || moved[j]) {
                    continue;
                }
                let (a, b) = (&self.balls[i], &self.balls[j]);
                let (pos_a, pos_b) = (a.position(), b.position());
                if let Some(contact) =
                    ContactDetector::ball_contact(&pos_a, radius, &pos_b, radius, j)
                {
                    contacts.push((i, contact));
                }
                if let Some(contact) =
                    ContactDetector::ball_contact(&pos_b, radius, &pos_a, radius, i)
                {
                    contacts.push((j, contact));
                }
            }
        }

        contacts
    }

    fn resolve(&mut self, index: usize, contact: &ContactInfo) -> bool {
        match contact.target {
            ContactTarget::Cushion(cushion) => {
                let reflected = self.balls[index].collide_wall(&contact.point, &contact.normal);
                if reflected {
                    tracing::debug!(ball = index, ?cushion, time = self.time, "cushion contact");
                }
                reflected
            }
            ContactTarget::Ball(other) => {
                let other = &self.balls[other];
                self.balls[index].collide_ball(
                    &other.position(),
                    &contact.normal,
                    &other.velocity(),
                    &other.angular_velocity(),
                );
                false
            }
        }
    }

    /// Contacts handled during the last [`Self::advance`].
    pub fn events(&self) -> &[ContactEvent] {
        &self.events
    }

    /// Whether every ball is at rest.
    pub fn is_settled(&self) -> bool {
        self.balls.iter().all(BallMotionModel::is_still)
    }

    /// Stop every ball where it is and rewind the clock.
    pub fn reset(&mut self) {
        for ball in &mut self.balls {
            ball.reset();
        }
        self.clock.reset();
        self.time = 0.0;
        self.ticks = 0;
        self.events.clear();
    }

    /// Simulated time (s).
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Fraction of a tick buffered but not yet simulated.
    pub fn alpha(&self) -> f64 {
        self.clock.alpha()
    }
}

// =============================================================================
// Tests
// =============================================================================
