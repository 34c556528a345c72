//! Mission Lifecycle Service
//!
//! Pre-condition checks for the mission state machine, plus the
//! auto-completion cascade. Each `validate_*` function loads the rows it
//! needs and returns the validated entities; the caller performs the
//! actual write. Check order is part of the contract: mission-state
//! conflicts are reported before cat lookups, and a target's own
//! completion before its mission's.

use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::types::UpdateTargetRequest;
use clowder_core::{Cat, CatId, Mission, MissionId, Target, TargetId};

// ============================================================================
// PURE GUARDS
// ============================================================================

/// A mission can take a cat only while incomplete and unassigned.
pub fn ensure_mission_assignable(mission: &Mission) -> ApiResult<()> {
    if mission.is_completed {
        return Err(ApiError::state_conflict(
            "Cannot assign cat to completed mission",
        ));
    }
    if mission.cat_id.is_some() {
        return Err(ApiError::state_conflict(
            "Mission already has a cat assigned",
        ));
    }
    Ok(())
}

/// A cat can only work one mission at a time. The conflicting mission is
/// named in the error.
pub fn ensure_cat_unassigned(existing: Option<&Mission>) -> ApiResult<()> {
    match existing {
        Some(mission) => Err(ApiError::state_conflict(format!(
            "Cat already assigned to mission {}",
            mission.mission_id
        ))),
        None => Ok(()),
    }
}

/// Notes freeze once the target, or the mission owning it, is completed.
/// The target's own state is checked first.
pub fn ensure_notes_mutable(mission: &Mission, target: &Target) -> ApiResult<()> {
    if target.is_completed {
        return Err(ApiError::state_conflict(
            "Cannot update notes: target is already completed",
        ));
    }
    if mission.is_completed {
        return Err(ApiError::state_conflict(
            "Cannot update notes: mission is already completed",
        ));
    }
    Ok(())
}

/// Whether every target has reached completion. Vacuously true for an
/// empty slice; creation enforces 1-3 targets so that never happens in
/// practice.
pub fn targets_all_completed(targets: &[Target]) -> bool {
    targets.iter().all(|target| target.is_completed)
}

// ============================================================================
// DATABASE-BACKED VALIDATION
// ============================================================================

/// Validate that a cat can be assigned to a mission.
///
/// Returns the (mission, cat) pair for the caller to perform the write.
pub async fn validate_can_assign_cat(
    db: &DbClient,
    mission_id: MissionId,
    cat_id: CatId,
) -> ApiResult<(Mission, Cat)> {
    let mission = db
        .mission_get(mission_id)
        .await?
        .ok_or_else(|| ApiError::mission_not_found(mission_id))?;

    ensure_mission_assignable(&mission)?;

    let cat = db
        .cat_get(cat_id)
        .await?
        .ok_or_else(|| ApiError::cat_not_found(cat_id))?;

    let existing = db.mission_find_by_cat(cat_id).await?;
    ensure_cat_unassigned(existing.as_ref())?;

    Ok((mission, cat))
}

/// Validate that a mission can be deleted. A mission with a cat assigned
/// cannot be.
pub async fn validate_can_delete_mission(
    db: &DbClient,
    mission_id: MissionId,
) -> ApiResult<Mission> {
    let mission = db
        .mission_get(mission_id)
        .await?
        .ok_or_else(|| ApiError::mission_not_found(mission_id))?;

    if mission.cat_id.is_some() {
        return Err(ApiError::state_conflict(
            "Cannot delete mission that is assigned to a cat",
        ));
    }

    Ok(mission)
}

/// Validate that a target update is allowed.
///
/// Only a notes change is gated by the freeze rules; a flag-only update
/// always passes. Returns the target as it was loaded.
pub async fn validate_can_update_target(
    db: &DbClient,
    mission_id: MissionId,
    target_id: TargetId,
    update: &UpdateTargetRequest,
) -> ApiResult<Target> {
    let mission = db
        .mission_get(mission_id)
        .await?
        .ok_or_else(|| ApiError::mission_not_found(mission_id))?;

    let target = db
        .target_get(mission_id, target_id)
        .await?
        .ok_or_else(|| ApiError::target_not_found(target_id, mission_id))?;

    if update.notes.is_some() {
        ensure_notes_mutable(&mission, &target)?;
    }

    Ok(target)
}

/// Run the completion cascade for a mission.
///
/// Re-loads the mission and its targets so the decision is made on the
/// latest state. If every target is complete and the mission flag is not
/// yet set, it is flipped exactly once; returns whether a transition
/// occurred. A completed or absent mission is a no-op.
pub async fn check_mission_completion(db: &DbClient, mission_id: MissionId) -> ApiResult<bool> {
    let Some(mission) = db.mission_get(mission_id).await? else {
        return Ok(false);
    };
    if mission.is_completed {
        return Ok(false);
    }

    let targets = db.targets_for_mission(mission_id).await?;
    if !targets_all_completed(&targets) {
        return Ok(false);
    }

    let transitioned = db.mission_mark_completed(mission_id).await?;
    if transitioned {
        tracing::info!(mission_id, "Mission auto-completed");
    }
    Ok(transitioned)
}
