//! Headless application loop.
//!
//! Wires the in-memory scene host and the lifecycle controller together,
//! loads the initial area and walks the configured route, one fixed-step
//! frame at a time.

use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::{Context, Result};
use crypt_scene::{
    AreaCatalog, ControllerSettings, MemoryHost, PlayerAnchor, SceneLifecycleController,
    TransitionOutcome, TransitionRequester,
};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;

/// Catalog used when no catalog file is present.
const DEFAULT_CATALOG: &str = include_str!("../assets/areas.ron");

/// Requests the next route entry each time a transition finishes.
#[derive(Debug)]
pub struct RouteDirector {
    requester: TransitionRequester,
    route: VecDeque<String>,
}

impl RouteDirector {
    /// Creates a director for the given route.
    #[must_use]
    pub fn new(requester: TransitionRequester, route: impl IntoIterator<Item = String>) -> Self {
        Self {
            requester,
            route: route.into_iter().collect(),
        }
    }

    /// Reacts to a finished transition by requesting the next area.
    pub fn on_outcome(&mut self, outcome: &TransitionOutcome) {
        if let TransitionOutcome::Failed(err) = outcome {
            debug!("Route continues after failed transition: {err}");
        }
        if let Some(next) = self.route.pop_front() {
            if !self.requester.request(next.clone()) {
                warn!(area = %next, "Could not queue route request");
            }
        }
    }

    /// Route entries not yet requested.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.route.len()
    }
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Frames simulated
    pub frames: u64,
    /// Current area at exit
    pub current_area: Option<String>,
    /// Transitions that completed
    pub completed: usize,
    /// Transitions that failed
    pub failed: usize,
    /// Whether the frame cap stopped the run
    pub hit_frame_cap: bool,
}

/// Loads the catalog named in the config, or the built-in one if the file is absent.
fn load_catalog(config: &EngineConfig) -> Result<AreaCatalog> {
    if config.catalog_path.exists() {
        return AreaCatalog::load_from(&config.catalog_path)
            .with_context(|| format!("loading catalog {}", config.catalog_path.display()));
    }

    info!(
        "Catalog {} not found, using built-in areas",
        config.catalog_path.display()
    );
    AreaCatalog::from_ron_str(DEFAULT_CATALOG).context("parsing built-in catalog")
}

/// Runs the transition loop for a config.
pub fn run_with(config: &EngineConfig) -> Result<RunSummary> {
    let catalog = load_catalog(config)?;
    info!(areas = ?catalog.names(), "Area catalog ready");

    let mut host = MemoryHost::new(
        catalog,
        config.bootstrap_area.as_str(),
        config.load_latency_frames,
    );

    let settings = ControllerSettings::default()
        .with_bootstrap_area(config.bootstrap_area.as_str())
        .with_fade_duration(config.fade_duration)
        .with_fade_easing(config.fade_easing);
    let mut controller = SceneLifecycleController::new(settings);
    let mut director = RouteDirector::new(controller.requester(), config.route.iter().cloned());

    controller
        .request_transition(config.initial_area.as_str())
        .context("requesting initial area")?;

    let dt = config.frame_dt();
    let mut summary = RunSummary::default();

    while summary.frames < config.max_frames {
        summary.frames += 1;
        host.advance();

        if let Some(outcome) = controller.tick(&mut host, dt) {
            match &outcome {
                TransitionOutcome::Completed { area, spawned } => {
                    summary.completed += 1;
                    let pose = host.anchor().map(PlayerAnchor::pose);
                    info!(
                        area = %area,
                        spawned,
                        position = ?pose.map(|p| p.position),
                        frame = summary.frames,
                        "Arrived"
                    );
                },
                TransitionOutcome::Failed(err) => {
                    summary.failed += 1;
                    warn!(frame = summary.frames, "Transition failed: {err}");
                },
            }
            director.on_outcome(&outcome);
        }

        if !controller.is_transitioning() && controller.pending_requests() == 0 {
            break;
        }
    }

    if controller.is_transitioning() || controller.pending_requests() > 0 {
        summary.hit_frame_cap = true;
        warn!(
            frames = summary.frames,
            phase = ?controller.phase(),
            "Frame cap reached with work outstanding"
        );
    }

    summary.current_area = controller.current_area().map(str::to_string);
    info!(
        loaded = ?host.loaded_areas(),
        remaining_route = director.remaining(),
        "Run finished"
    );
    Ok(summary)
}

/// Loads configuration and runs.
pub fn run() -> Result<RunSummary> {
    let mut config = EngineConfig::load();
    config.validate();

    info!("Configuration loaded:");
    info!("  Bootstrap area: {}", config.bootstrap_area);
    info!("  Initial area: {}", config.initial_area);
    info!(
        "  Fade: {:.2}s, {:?}",
        config.fade_duration, config.fade_easing
    );
    info!("  Tick rate: {} Hz", config.tick_rate);

    run_with(&config)
}

/// Writes the default config where [`EngineConfig::write_path`] points.
pub fn write_default_config() -> Result<PathBuf> {
    let path = EngineConfig::write_path();
    EngineConfig::default().save_to(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypt_scene::FadeEasing;

    fn config() -> EngineConfig {
        EngineConfig {
            catalog_path: PathBuf::from("/nonexistent/areas.ron"),
            fade_duration: 0.2,
            load_latency_frames: 2,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = AreaCatalog::from_ron_str(DEFAULT_CATALOG).expect("built-in catalog");
        for name in ["Bootstrap", "Dungeon1", "Dungeon2", "Dungeon3"] {
            assert!(catalog.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_run_initial_and_route() {
        let mut config = config();
        config.route = vec!["Dungeon2".to_string(), "Dungeon3".to_string()];

        let summary = run_with(&config).expect("run should succeed");
        assert_eq!(summary.completed, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.current_area.as_deref(), Some("Dungeon3"));
        assert!(!summary.hit_frame_cap);
    }

    #[test]
    fn test_run_continues_after_failure() {
        let mut config = config();
        config.route = vec!["Atlantis".to_string(), "Dungeon2".to_string()];

        let summary = run_with(&config).expect("run should succeed");
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.current_area.as_deref(), Some("Dungeon2"));
    }

    #[test]
    fn test_run_with_eased_fade() {
        let mut config = config();
        config.fade_easing = FadeEasing::SmoothStep;
        config.route.clear();

        let summary = run_with(&config).expect("run should succeed");
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.current_area.as_deref(), Some("Dungeon1"));
    }

    #[test]
    fn test_run_stops_at_frame_cap() {
        let mut config = config();
        config.max_frames = 3;
        config.fade_duration = 5.0;

        let summary = run_with(&config).expect("run should succeed");
        assert_eq!(summary.frames, 3);
        assert!(summary.hit_frame_cap);
        assert_eq!(summary.current_area, None);
    }

    #[test]
    fn test_run_reads_catalog_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("areas.ron");
        std::fs::write(
            &path,
            r#"[(name: "Bootstrap"), (name: "Cellar", roots: [(name: "SpawnPoint")])]"#,
        )
        .expect("write catalog");

        let mut config = config();
        config.catalog_path = path;
        config.initial_area = "Cellar".to_string();
        config.route.clear();

        let summary = run_with(&config).expect("run should succeed");
        assert_eq!(summary.current_area.as_deref(), Some("Cellar"));
        assert_eq!(summary.completed, 1);
    }

    #[test]
    fn test_director_requests_in_order() {
        let controller = SceneLifecycleController::default();
        let mut director = RouteDirector::new(
            controller.requester(),
            ["A".to_string(), "B".to_string()],
        );
        let done = TransitionOutcome::Completed {
            area: "X".into(),
            spawned: false,
        };

        director.on_outcome(&done);
        assert_eq!(controller.pending_requests(), 1);
        assert_eq!(director.remaining(), 1);
        director.on_outcome(&done);
        director.on_outcome(&done);
        assert_eq!(controller.pending_requests(), 2);
        assert_eq!(director.remaining(), 0);
    }
}
