use crate::skeleton::{JointSample, Skeleton};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// One potentially tracked person reported by the sensor for a single frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyCandidate {
    /// Sensor-assigned identity, stable while the body stays tracked
    pub tracking_id: u64,
    pub is_tracked: bool,
    #[serde(default)]
    pub joints: Vec<JointSample>,
}

impl BodyCandidate {
    pub fn new(tracking_id: u64, is_tracked: bool, joints: Vec<JointSample>) -> Self {
        Self {
            tracking_id,
            is_tracked,
            joints,
        }
    }

    pub fn skeleton(&self) -> Skeleton {
        Skeleton::new(self.joints.clone())
    }
}

/// Cross-frame state of the body selector.
///
/// Once an identity is adopted it is never cleared, only replaced.
#[derive(Debug, Clone, Default)]
pub struct TrackingContext {
    current_identity: Option<u64>,
    last_seen: Option<Instant>,
}

impl TrackingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_identity(&self) -> Option<u64> {
        self.current_identity
    }

    pub fn last_seen(&self) -> Option<Instant> {
        self.last_seen
    }

    /// Whether a skeleton was selected within `grace` of `now`
    pub fn is_visible(&self, now: Instant, grace: Duration) -> bool {
        self.last_seen
            .map(|seen| now.saturating_duration_since(seen) < grace)
            .unwrap_or(false)
    }
}

/// Pick this frame's body, preferring the identity followed so far.
///
/// Candidates are scanned once in sensor order. A tracked candidate carrying
/// the current identity wins; otherwise the first tracked candidate is adopted
/// and its identity replaces the current one. With no tracked candidate the
/// context is left untouched and `None` is returned.
pub fn select(
    candidates: &[BodyCandidate],
    ctx: &mut TrackingContext,
    now: Instant,
) -> Option<Skeleton> {
    let mut first_tracked: Option<&BodyCandidate> = None;
    let mut matched: Option<&BodyCandidate> = None;

    for candidate in candidates.iter().filter(|c| c.is_tracked) {
        if first_tracked.is_none() {
            first_tracked = Some(candidate);
        }
        match ctx.current_identity {
            Some(identity) if identity != candidate.tracking_id => {}
            _ => {
                matched = Some(candidate);
                break;
            }
        }
    }

    let chosen = match (matched, first_tracked) {
        (Some(candidate), _) => candidate,
        (None, Some(candidate)) => {
            info!(
                "Tracked body {:?} no longer present, switching to body {}",
                ctx.current_identity, candidate.tracking_id
            );
            candidate
        }
        (None, None) => {
            debug!("No tracked body in frame ({} candidates)", candidates.len());
            return None;
        }
    };

    if ctx.current_identity.is_none() {
        info!("Tracking body {}", chosen.tracking_id);
    }
    ctx.current_identity = Some(chosen.tracking_id);
    ctx.last_seen = Some(now);

    Some(chosen.skeleton())
}
