//! In-memory scene host.
//!
//! Stands in for the engine's scene manager in the headless runner and in
//! tests. Loads and unloads finish after a fixed number of [`MemoryHost::advance`]
//! frames, and every call the controller makes is appended to a journal.

use ahash::AHashMap;
use crypt_common::{LoadHandle, Pose};
use tracing::{debug, warn};

use crate::area::Area;
use crate::catalog::AreaCatalog;
use crate::host::{PlayerAnchor, SceneHost};

/// A call made against the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    /// `begin_load`
    Load {
        /// Area name
        area: String,
    },
    /// `begin_unload`
    Unload {
        /// Area name
        area: String,
    },
    /// `set_active_area`
    SetActive {
        /// Area name
        area: String,
    },
}

/// A change applied to the player rig.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorOp {
    /// Movement component switched
    Motion(bool),
    /// Pose written
    Pose(Pose),
}

/// Player rig owned by the bootstrap area.
#[derive(Debug, Clone, Default)]
pub struct AnchorRig {
    pose: Pose,
    motion_enabled: bool,
    ops: Vec<AnchorOp>,
}

impl AnchorRig {
    /// Creates a rig at a pose with motion enabled.
    #[must_use]
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            motion_enabled: true,
            ops: Vec::new(),
        }
    }

    /// Changes applied so far, oldest first.
    #[must_use]
    pub fn ops(&self) -> &[AnchorOp] {
        &self.ops
    }
}

impl PlayerAnchor for AnchorRig {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.ops.push(AnchorOp::Pose(pose));
    }

    fn set_motion_enabled(&mut self, enabled: bool) {
        self.motion_enabled = enabled;
        self.ops.push(AnchorOp::Motion(enabled));
    }

    fn motion_enabled(&self) -> bool {
        self.motion_enabled
    }
}

#[derive(Debug, Clone)]
enum PendingKind {
    Load(String),
    Unload(String),
}

#[derive(Debug, Clone)]
struct PendingOp {
    handle: LoadHandle,
    kind: PendingKind,
    frames_left: u32,
}

/// Scene host backed by an [`AreaCatalog`].
#[derive(Debug)]
pub struct MemoryHost {
    catalog: AreaCatalog,
    bootstrap: String,
    loaded: AHashMap<String, Area>,
    active: Option<String>,
    pending: Vec<PendingOp>,
    next_handle: u64,
    latency_frames: u32,
    anchor: Option<AnchorRig>,
    journal: Vec<HostOp>,
}

impl MemoryHost {
    /// Creates a host with the bootstrap area loaded and active.
    ///
    /// A bootstrap area missing from the catalog is created empty.
    #[must_use]
    pub fn new(catalog: AreaCatalog, bootstrap: impl Into<String>, latency_frames: u32) -> Self {
        let bootstrap = bootstrap.into();
        let area = catalog.instantiate(&bootstrap).unwrap_or_else(|| {
            warn!(area = %bootstrap, "Bootstrap area not in catalog, using an empty one");
            Area::new(&bootstrap)
        });

        let mut loaded = AHashMap::new();
        loaded.insert(bootstrap.clone(), area);

        Self {
            catalog,
            active: Some(bootstrap.clone()),
            bootstrap,
            loaded,
            pending: Vec::new(),
            next_handle: 1,
            latency_frames,
            anchor: Some(AnchorRig::new(Pose::IDENTITY)),
            journal: Vec::new(),
        }
    }

    /// Places the player rig at a pose.
    #[must_use]
    pub fn with_anchor_pose(mut self, pose: Pose) -> Self {
        self.anchor = Some(AnchorRig::new(pose));
        self
    }

    /// Removes the player rig (the host can no longer find an anchor).
    #[must_use]
    pub fn without_anchor(mut self) -> Self {
        self.anchor = None;
        self
    }

    /// Advances pending operations by one frame.
    pub fn advance(&mut self) {
        for op in &mut self.pending {
            op.frames_left = op.frames_left.saturating_sub(1);
        }

        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|op| op.frames_left == 0);
        self.pending = waiting;

        for op in ready {
            self.apply(op);
        }
    }

    fn apply(&mut self, op: PendingOp) {
        match op.kind {
            PendingKind::Load(name) => {
                if let Some(area) = self.catalog.instantiate(&name) {
                    debug!(area = %name, handle = %op.handle, "Area loaded");
                    self.loaded.insert(name, area);
                }
            },
            PendingKind::Unload(name) => {
                self.loaded.remove(&name);
                if self.active.as_deref() == Some(name.as_str()) {
                    self.active = self
                        .loaded
                        .contains_key(&self.bootstrap)
                        .then(|| self.bootstrap.clone());
                }
                debug!(area = %name, handle = %op.handle, "Area unloaded");
            },
        }
    }

    fn issue(&mut self, kind: PendingKind) -> LoadHandle {
        let handle = LoadHandle::from_raw(self.next_handle);
        self.next_handle += 1;

        let op = PendingOp {
            handle,
            kind,
            frames_left: self.latency_frames,
        };
        if self.latency_frames == 0 {
            self.apply(op);
        } else {
            self.pending.push(op);
        }
        handle
    }

    /// Calls made so far, oldest first.
    #[must_use]
    pub fn journal(&self) -> &[HostOp] {
        &self.journal
    }

    /// Names of loaded areas, sorted.
    #[must_use]
    pub fn loaded_areas(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.loaded.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Whether an area is loaded.
    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// The active area.
    #[must_use]
    pub fn active_area(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The player rig, if present.
    #[must_use]
    pub fn anchor(&self) -> Option<&AnchorRig> {
        self.anchor.as_ref()
    }

    /// Number of operations still in progress.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl SceneHost for MemoryHost {
    fn begin_load(&mut self, area: &str) -> Option<LoadHandle> {
        self.journal.push(HostOp::Load {
            area: area.to_string(),
        });
        if !self.catalog.contains(area) {
            warn!(area = %area, "Unknown area, load refused");
            return None;
        }
        Some(self.issue(PendingKind::Load(area.to_string())))
    }

    fn begin_unload(&mut self, area: &str) -> Option<LoadHandle> {
        self.journal.push(HostOp::Unload {
            area: area.to_string(),
        });
        if !self.loaded.contains_key(area) {
            warn!(area = %area, "Area not loaded, unload refused");
            return None;
        }
        Some(self.issue(PendingKind::Unload(area.to_string())))
    }

    // Handles are issued in increasing order, so an issued handle that is no
    // longer pending has completed.
    fn is_complete(&self, handle: LoadHandle) -> bool {
        let issued = handle.raw() > 0 && handle.raw() < self.next_handle;
        issued && !self.pending.iter().any(|op| op.handle == handle)
    }

    fn set_active_area(&mut self, area: &str) {
        self.journal.push(HostOp::SetActive {
            area: area.to_string(),
        });
        if self.loaded.contains_key(area) {
            self.active = Some(area.to_string());
        } else {
            warn!(area = %area, "Cannot activate an area that is not loaded");
        }
    }

    fn area(&self, name: &str) -> Option<&Area> {
        self.loaded.get(name)
    }

    fn player_anchor(&mut self) -> Option<&mut dyn PlayerAnchor> {
        self.anchor.as_mut().map(|rig| rig as &mut dyn PlayerAnchor)
    }
}
