//! Area lifecycle controller.
//!
//! Owns the persistent bootstrap context and moves the player between content
//! areas. A transition runs as an explicit state machine advanced once per
//! frame by [`SceneLifecycleController::tick`]:
//!
//! 1. fade out (half the fade duration)
//! 2. begin an additive load of the target area
//! 3. wait for the load to complete
//! 4. make the target the active area
//! 5. move the player anchor to the area's spawn marker, if any
//! 6. unload the previous area (never the bootstrap area) and wait for it
//! 7. record the target as current
//! 8. fade in (remaining half)
//! 9. return to idle
//!
//! At most one transition is in flight. Requests that arrive while one is
//! running are dropped with a warning, never queued.

use crypt_common::{LoadHandle, SceneError, TransitionError};
use tracing::{debug, error, info, warn};

use crate::fade::{FadeDirection, FadeEasing, FadeTimer, MAX_FADE_DURATION};
use crate::host::{teleport_anchor, SceneHost};
use crate::requests::{RequestQueue, TransitionRequester, DEFAULT_REQUEST_CAPACITY};
use crate::spawn::{SpawnLocator, SpawnPatterns};

/// Default name of the permanently loaded bootstrap area.
pub const DEFAULT_BOOTSTRAP_AREA: &str = "Bootstrap";

/// Default full fade duration in seconds (split across both halves).
pub const DEFAULT_FADE_DURATION: f32 = 1.0;

/// Maximum transition history entries.
const MAX_HISTORY: usize = 32;

/// Controller settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    /// Name of the area that is never unloaded
    pub bootstrap_area: String,
    /// Full fade duration in seconds
    pub fade_duration: f32,
    /// Easing applied to the fade alpha
    pub fade_easing: FadeEasing,
    /// Spawn marker vocabulary
    pub spawn_patterns: SpawnPatterns,
    /// Capacity of the request channel
    pub request_capacity: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            bootstrap_area: DEFAULT_BOOTSTRAP_AREA.to_string(),
            fade_duration: DEFAULT_FADE_DURATION,
            fade_easing: FadeEasing::default(),
            spawn_patterns: SpawnPatterns::default(),
            request_capacity: DEFAULT_REQUEST_CAPACITY,
        }
    }
}

impl ControllerSettings {
    /// Sets the bootstrap area name.
    #[must_use]
    pub fn with_bootstrap_area(mut self, name: impl Into<String>) -> Self {
        self.bootstrap_area = name.into();
        self
    }

    /// Sets the fade duration, clamped to `[0, MAX_FADE_DURATION]`.
    ///
    /// A non-finite value falls back to [`DEFAULT_FADE_DURATION`].
    #[must_use]
    pub fn with_fade_duration(mut self, seconds: f32) -> Self {
        self.fade_duration = if seconds.is_finite() {
            seconds.clamp(0.0, MAX_FADE_DURATION)
        } else {
            DEFAULT_FADE_DURATION
        };
        self
    }

    /// Sets the easing applied to the fade alpha.
    #[must_use]
    pub fn with_fade_easing(mut self, easing: FadeEasing) -> Self {
        self.fade_easing = easing;
        self
    }
}

/// Where a transition currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    /// No transition in flight.
    #[default]
    Idle,
    /// Waiting out the first half of the fade.
    FadingOut,
    /// Waiting for the target area to load.
    Loading(LoadHandle),
    /// Waiting for the previous area to unload.
    Unloading(LoadHandle),
    /// Waiting out the second half of the fade.
    FadingIn,
}

impl TransitionPhase {
    /// Whether a transition is in flight.
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// How a transition ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The target area is loaded and current.
    Completed {
        /// Area that became current
        area: String,
        /// Whether the player anchor was moved to a spawn marker
        spawned: bool,
    },
    /// The transition stopped early; nothing changed.
    Failed(SceneError),
}

impl TransitionOutcome {
    /// Whether the transition completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Record of a finished transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRecord {
    /// Area that was current before
    pub from: Option<String>,
    /// Requested area
    pub target: String,
    /// How it ended
    pub outcome: TransitionOutcome,
    /// Seconds of frame time the transition took
    pub elapsed: f32,
}

/// Bookkeeping for the transition in flight.
#[derive(Debug)]
struct InFlight {
    target: String,
    from: Option<String>,
    previous: Option<String>,
    spawned: bool,
    elapsed: f32,
}

/// Result of running one phase.
enum Step {
    /// Suspend until the next tick.
    Wait,
    /// Run the next phase in this tick.
    Continue,
    /// The transition ended.
    Finished(TransitionOutcome),
}

/// Drives area transitions against a [`SceneHost`].
pub struct SceneLifecycleController {
    settings: ControllerSettings,
    locator: SpawnLocator,
    phase: TransitionPhase,
    in_flight: Option<InFlight>,
    current_area: Option<String>,
    fade: FadeTimer,
    requests: RequestQueue,
    history: Vec<TransitionRecord>,
}

impl Default for SceneLifecycleController {
    fn default() -> Self {
        Self::new(ControllerSettings::default())
    }
}

impl SceneLifecycleController {
    /// Creates an idle controller with no current area.
    #[must_use]
    pub fn new(settings: ControllerSettings) -> Self {
        let locator = SpawnLocator::with_patterns(settings.spawn_patterns.clone());
        let fade = FadeTimer::new(settings.fade_easing);
        let requests = RequestQueue::new(settings.request_capacity);
        Self {
            settings,
            locator,
            phase: TransitionPhase::Idle,
            in_flight: None,
            current_area: None,
            fade,
            requests,
            history: Vec::new(),
        }
    }

    /// Returns a handle collaborators can use to request transitions.
    #[must_use]
    pub fn requester(&self) -> TransitionRequester {
        self.requests.requester()
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Returns whether a transition is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Returns the current content area, if any.
    #[must_use]
    pub fn current_area(&self) -> Option<&str> {
        self.current_area.as_deref()
    }

    /// Returns the target of the transition in flight.
    #[must_use]
    pub fn target_area(&self) -> Option<&str> {
        self.in_flight.as_ref().map(|t| t.target.as_str())
    }

    /// Returns the number of queued requests not yet drained.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.requests.pending_count()
    }

    /// Returns the transition history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Overlay opacity for a renderer-side fade (0 = clear, 1 = covered).
    #[must_use]
    pub fn fade_alpha(&self) -> f32 {
        match self.phase {
            TransitionPhase::Idle => 0.0,
            TransitionPhase::FadingOut | TransitionPhase::FadingIn => self.fade.alpha(),
            TransitionPhase::Loading(_) | TransitionPhase::Unloading(_) => 1.0,
        }
    }

    /// Starts a transition to `target`.
    ///
    /// Fails with [`TransitionError::RequestIgnored`] if a transition is
    /// already in flight; the request is dropped and nothing else changes.
    pub fn request_transition(&mut self, target: impl Into<String>) -> Result<(), TransitionError> {
        let target = target.into();

        if let Some(running) = &self.in_flight {
            warn!(
                requested = %target,
                in_flight = %running.target,
                "Transition already in progress, request ignored"
            );
            return Err(TransitionError::RequestIgnored {
                requested: target,
                in_flight: running.target.clone(),
            });
        }

        info!(
            area = %target,
            from = ?self.current_area,
            "Transition started"
        );

        self.in_flight = Some(InFlight {
            target,
            from: self.current_area.clone(),
            previous: None,
            spawned: false,
            elapsed: 0.0,
        });
        self.fade
            .start(FadeDirection::Out, self.settings.fade_duration * 0.5);
        self.phase = TransitionPhase::FadingOut;
        Ok(())
    }

    /// Advances the transition in flight by one frame.
    ///
    /// Pending requests from [`TransitionRequester`]s are applied first, in
    /// arrival order. Returns the outcome when a transition ends this frame.
    pub fn tick<H>(&mut self, host: &mut H, dt: f32) -> Option<TransitionOutcome>
    where
        H: SceneHost + ?Sized,
    {
        for target in self.requests.drain() {
            // Ignored requests are already logged
            let _ = self.request_transition(target);
        }

        let in_flight = self.in_flight.as_mut()?;
        in_flight.elapsed += dt.max(0.0);

        // Only a phase that was already waiting when the frame began sees
        // this frame's time.
        let mut budget = dt;
        loop {
            match self.step(host, std::mem::take(&mut budget)) {
                Step::Wait => return None,
                Step::Continue => {},
                Step::Finished(outcome) => {
                    self.finish(outcome.clone());
                    return Some(outcome);
                },
            }
        }
    }

    fn step<H>(&mut self, host: &mut H, dt: f32) -> Step
    where
        H: SceneHost + ?Sized,
    {
        match self.phase {
            TransitionPhase::Idle => Step::Wait,
            TransitionPhase::FadingOut => {
                self.fade.advance(dt);
                if !self.fade.is_finished() {
                    return Step::Wait;
                }
                self.begin_load(host)
            },
            TransitionPhase::Loading(handle) => {
                if !host.is_complete(handle) {
                    return Step::Wait;
                }
                self.on_loaded(host)
            },
            TransitionPhase::Unloading(handle) => {
                if !host.is_complete(handle) {
                    return Step::Wait;
                }
                if let Some(prev) = self.in_flight.as_ref().and_then(|t| t.previous.as_ref()) {
                    info!(area = %prev, "Unload done");
                }
                self.commit_current();
                Step::Continue
            },
            TransitionPhase::FadingIn => {
                self.fade.advance(dt);
                if !self.fade.is_finished() {
                    return Step::Wait;
                }
                match &self.in_flight {
                    Some(t) => Step::Finished(TransitionOutcome::Completed {
                        area: t.target.clone(),
                        spawned: t.spawned,
                    }),
                    None => Step::Wait,
                }
            },
        }
    }

    fn begin_load<H>(&mut self, host: &mut H) -> Step
    where
        H: SceneHost + ?Sized,
    {
        let Some(target) = self.in_flight.as_ref().map(|t| t.target.clone()) else {
            return Step::Wait;
        };

        info!(area = %target, "Load start");
        match host.begin_load(&target) {
            Some(handle) => {
                debug!(area = %target, %handle, "Load handle issued");
                self.phase = TransitionPhase::Loading(handle);
                Step::Continue
            },
            None => {
                let err = SceneError::LoadFailure { area: target };
                error!("{err}");
                Step::Finished(TransitionOutcome::Failed(err))
            },
        }
    }

    fn on_loaded<H>(&mut self, host: &mut H) -> Step
    where
        H: SceneHost + ?Sized,
    {
        let Some(target) = self.in_flight.as_ref().map(|t| t.target.clone()) else {
            return Step::Wait;
        };
        info!(area = %target, "Load done");

        host.set_active_area(&target);
        let spawned = self.place_player(host, &target);

        let previous = self
            .current_area
            .clone()
            .filter(|prev| *prev != self.settings.bootstrap_area && *prev != target);

        if let Some(t) = self.in_flight.as_mut() {
            t.spawned = spawned;
            t.previous.clone_from(&previous);
        }

        let Some(previous) = previous else {
            self.commit_current();
            return Step::Continue;
        };

        info!(area = %previous, "Unload start");
        match host.begin_unload(&previous) {
            Some(handle) => {
                self.phase = TransitionPhase::Unloading(handle);
            },
            None => {
                warn!("{}", SceneError::UnloadFailure { area: previous });
                self.commit_current();
            },
        }
        Step::Continue
    }

    /// Moves the player anchor to the target's spawn marker.
    ///
    /// Returns whether the anchor was moved.
    fn place_player<H>(&self, host: &mut H, target: &str) -> bool
    where
        H: SceneHost + ?Sized,
    {
        let Some(area) = host.area(target) else {
            warn!(
                "{}, spawn placement skipped",
                SceneError::AreaMissing {
                    area: target.to_string()
                }
            );
            return false;
        };

        let Some(marker) = self.locator.find_spawn_marker(area) else {
            info!(area = %target, "No spawn marker found, player left in place");
            return false;
        };

        let Some(anchor) = host.player_anchor() else {
            warn!("{}, spawn placement skipped", SceneError::AnchorNotFound);
            return false;
        };

        teleport_anchor(anchor, marker.pose);
        info!(
            area = %target,
            marker = %marker.name,
            position = ?marker.pose.position,
            "Player moved to spawn marker"
        );
        true
    }

    /// Records the target as current and starts the fade in.
    fn commit_current(&mut self) {
        if let Some(t) = &self.in_flight {
            self.current_area = Some(t.target.clone());
        }
        self.fade
            .start(FadeDirection::In, self.settings.fade_duration * 0.5);
        self.phase = TransitionPhase::FadingIn;
    }

    fn finish(&mut self, outcome: TransitionOutcome) {
        self.phase = TransitionPhase::Idle;
        let Some(done) = self.in_flight.take() else {
            return;
        };

        if outcome.is_completed() {
            info!(area = %done.target, elapsed = done.elapsed, "Transition complete");
        } else {
            warn!(area = %done.target, "Transition aborted");
        }

        self.history.push(TransitionRecord {
            from: done.from,
            target: done.target,
            outcome,
            elapsed: done.elapsed,
        });
        while self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
    }
}

impl std::fmt::Debug for SceneLifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneLifecycleController")
            .field("phase", &self.phase)
            .field("current_area", &self.current_area)
            .field("target_area", &self.target_area())
            .finish_non_exhaustive()
    }
}
