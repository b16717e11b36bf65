//! Application state and input handling.
//!
//! The app owns the stage, the press state machine, and both input sources.
//! All input is resolved and applied on the single update thread: a ray is
//! hit-tested against the stage, the resulting key is pressed, and per-source
//! bookkeeping remembers it for the matching release. Nothing here returns an
//! error to the loop; a missed hit or a failed tone is logged and dropped.

use crate::config::StageConfig;
use crate::error::Result;
use crate::input::{Controller, PlanCamera, PointerInput};
use crate::piano::{AudioSink, PressController, PressOutcome};
use crate::scene::{resolve, KeyRef, Ray, Stage, TweenBank, Vec3};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

/// How far one controller nudge moves it, in meters.
pub const CONTROLLER_STEP: f64 = 0.0125;

/// How long status messages stay on screen.
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App<A> {
    /// Every keyboard in the scene.
    stage: Stage,
    /// Press/release state machine, with the audio sink and tilt tweens.
    presses: PressController<A, TweenBank>,
    /// Mouse pointer and the keys it holds.
    pub pointer: PointerInput,
    /// Hand controller and the keys it holds.
    pub controller: Controller,
    /// Top-down view used to turn screen positions into rays.
    pub camera: PlanCamera,
    /// Screen region the stage was last drawn in, for mouse hit testing.
    pub stage_area: Rect,
    /// Status message to display.
    pub status_message: Option<(String, Instant)>,
}

impl<A: AudioSink> App<A> {
    /// Creates an app for the keyboards described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid. Keyboards are built
    /// before any input is accepted, so layout mistakes surface here.
    pub fn new(config: &StageConfig, audio: A) -> Result<Self> {
        let stage = Stage::from_config(config)?;
        let camera = PlanCamera::framing(&stage);
        Ok(Self {
            stage,
            presses: PressController::new(audio, TweenBank::new()),
            pointer: PointerInput::default(),
            controller: Controller::default(),
            camera,
            stage_area: Rect::default(),
            status_message: None,
        })
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn tweens(&self) -> &TweenBank {
        self.presses.animator()
    }

    pub fn audio(&self) -> &A {
        self.presses.audio()
    }

    /// Advances animations by one tick.
    pub fn tick(&mut self, dt: Duration) {
        self.presses.animator_mut().advance(dt);
        self.clear_expired_status();
    }

    /// Hit-tests `ray` and presses the key it lands on.
    ///
    /// # Returns
    ///
    /// The key hit, or None if the ray missed every key
    pub fn press_with_ray(&mut self, ray: Ray) -> Option<KeyRef> {
        let surfaces = self.stage.surfaces(self.presses.animator());
        let Some(hit) = resolve(ray, &surfaces) else {
            tracing::debug!("Ray from {:?} hit no key", ray.origin);
            return None;
        };

        let key = self.stage.key_mut(hit.key)?;
        let note = key.note();
        if self.presses.press(hit.key, key) == PressOutcome::Pressed {
            self.set_status(format!("Playing {}", note));
        }
        Some(hit.key)
    }

    fn release(&mut self, target: KeyRef) {
        match self.stage.key_mut(target) {
            Some(key) => {
                self.presses.release(target, key);
            }
            None => tracing::warn!("Release for unknown key {:?}", target),
        }
    }

    /// Pointer pressed at normalized device coordinates.
    pub fn pointer_down(&mut self, ndc_x: f64, ndc_y: f64) -> Option<KeyRef> {
        let ray = self.camera.ray_through(ndc_x, ndc_y);
        let target = self.press_with_ray(ray)?;
        self.pointer.held.hold(target);
        Some(target)
    }

    /// Pointer lifted: releases every key the pointer pressed.
    pub fn pointer_up(&mut self) {
        for target in self.pointer.held.take_all() {
            self.release(target);
        }
    }

    /// Controller trigger pulled: presses the key it points at.
    pub fn controller_trigger_down(&mut self) -> Option<KeyRef> {
        self.controller.set_trigger_down(true);
        let ray = self.controller.forward_ray();
        let target = self.press_with_ray(ray)?;
        self.controller.held.hold(target);
        Some(target)
    }

    /// Controller trigger let go: releases the keys this controller pressed.
    pub fn controller_trigger_up(&mut self) {
        self.controller.set_trigger_down(false);
        for target in self.controller.held.take_all() {
            self.release(target);
        }
    }

    /// Pulls the trigger if it is up, lets go if it is down.
    ///
    /// Terminals rarely report key releases, so a single key toggles it.
    pub fn toggle_controller_trigger(&mut self) {
        if self.controller.is_trigger_down() {
            self.controller_trigger_up();
        } else if self.controller_trigger_down().is_none() {
            self.set_status("Controller is not pointing at a key");
        }
    }

    /// Moves the controller across the stage, keeping its orientation.
    pub fn nudge_controller(&mut self, dx: f64, dz: f64) {
        let position = self.controller.position + Vec3::new(dx, 0.0, dz);
        self.controller.set_pose(position, self.controller.orientation);
    }

    /// Releases every key held by any source.
    pub fn release_all(&mut self) {
        self.pointer_up();
        self.controller_trigger_up();
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Clears expired status messages.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
            }
        }
    }
}
