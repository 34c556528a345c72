//! End-to-end smoke tests for the Clowder API
//!
//! These tests exercise the database client and the mission lifecycle
//! service against a live PostgreSQL instance. They are gated behind the
//! `db-tests` feature; configure the target database via the usual
//! `CLOWDER_DB_*` environment variables before enabling it.
#![cfg(feature = "db-tests")]

use clowder_api::error::ErrorCode;
use clowder_api::services;
use clowder_api::types::{
    CreateCatRequest, CreateMissionRequest, CreateTargetRequest, UpdateTargetRequest,
};
use clowder_api::{ApiResult, DbClient, DbConfig};

fn test_db() -> ApiResult<DbClient> {
    let config = DbConfig::from_env();
    DbClient::from_config(&config)
}

fn sample_cat(name: &str) -> CreateCatRequest {
    CreateCatRequest {
        name: name.to_string(),
        years_of_experience: 4,
        breed: "Maine Coon".to_string(),
        salary: 1500.0,
    }
}

fn sample_mission(target_names: &[&str]) -> CreateMissionRequest {
    CreateMissionRequest {
        targets: target_names
            .iter()
            .map(|name| CreateTargetRequest {
                name: name.to_string(),
                country: "FR".to_string(),
            })
            .collect(),
    }
}

fn notes_update(notes: &str) -> UpdateTargetRequest {
    UpdateTargetRequest {
        notes: Some(notes.to_string()),
        is_completed: None,
    }
}

fn completion_update() -> UpdateTargetRequest {
    UpdateTargetRequest {
        notes: None,
        is_completed: Some(true),
    }
}

#[tokio::test]
async fn smoke_test_cat_crud_chain() -> ApiResult<()> {
    let db = test_db()?;
    db.ensure_schema().await?;

    let cat = db.cat_create(&sample_cat("smoke-cat-crud")).await?;
    assert_eq!(cat.name, "smoke-cat-crud");
    assert_eq!(cat.years_of_experience, 4);

    let fetched = db.cat_get(cat.cat_id).await?.expect("cat exists");
    assert_eq!(fetched, cat);

    let updated = db
        .cat_update_salary(cat.cat_id, 2000.0)
        .await?
        .expect("cat exists");
    assert_eq!(updated.salary, 2000.0);
    // salary is the only field that moved
    assert_eq!(updated.name, cat.name);
    assert_eq!(updated.breed, cat.breed);

    assert!(db.cat_delete(cat.cat_id).await?);
    assert!(db.cat_get(cat.cat_id).await?.is_none());
    assert!(!db.cat_delete(cat.cat_id).await?);

    Ok(())
}

#[tokio::test]
async fn smoke_test_mission_creation_invariants() -> ApiResult<()> {
    let db = test_db()?;
    db.ensure_schema().await?;

    let (mission, targets) = db.mission_create(&sample_mission(&["T1", "T2"])).await?;
    assert!(!mission.is_completed);
    assert!(mission.cat_id.is_none());
    assert_eq!(targets.len(), 2);
    for target in &targets {
        assert_eq!(target.mission_id, mission.mission_id);
        assert_eq!(target.notes, "");
        assert!(!target.is_completed);
    }

    let record = db
        .mission_get_full(mission.mission_id)
        .await?
        .expect("mission exists");
    assert_eq!(record.targets, targets);
    assert!(record.cat.is_none());

    Ok(())
}

#[tokio::test]
async fn smoke_test_assignment_rules() -> ApiResult<()> {
    let db = test_db()?;
    db.ensure_schema().await?;

    let cat_a = db.cat_create(&sample_cat("smoke-assign-a")).await?;
    let cat_b = db.cat_create(&sample_cat("smoke-assign-b")).await?;
    let (m1, _) = db.mission_create(&sample_mission(&["T1"])).await?;
    let (m2, _) = db.mission_create(&sample_mission(&["T1"])).await?;

    services::validate_can_assign_cat(&db, m1.mission_id, cat_a.cat_id).await?;
    assert!(db.mission_assign_cat(m1.mission_id, cat_a.cat_id).await?);

    // Second cat on the same mission conflicts.
    let err = services::validate_can_assign_cat(&db, m1.mission_id, cat_b.cat_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StateConflict);
    assert_eq!(err.message, "Mission already has a cat assigned");

    // Same cat on a second mission conflicts, naming the first mission.
    let err = services::validate_can_assign_cat(&db, m2.mission_id, cat_a.cat_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StateConflict);
    assert!(err
        .message
        .contains(&format!("mission {}", m1.mission_id)));

    // Unknown ids surface as not-found, in mission-first order.
    let err = services::validate_can_assign_cat(&db, i64::MAX, cat_b.cat_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissionNotFound);
    let err = services::validate_can_assign_cat(&db, m2.mission_id, i64::MAX)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CatNotFound);

    Ok(())
}

#[tokio::test]
async fn smoke_test_mission_delete_rules() -> ApiResult<()> {
    let db = test_db()?;
    db.ensure_schema().await?;

    let cat = db.cat_create(&sample_cat("smoke-delete")).await?;
    let (mission, targets) = db.mission_create(&sample_mission(&["T1", "T2", "T3"])).await?;

    services::validate_can_assign_cat(&db, mission.mission_id, cat.cat_id).await?;
    assert!(db.mission_assign_cat(mission.mission_id, cat.cat_id).await?);

    // Assigned missions cannot be deleted.
    let err = services::validate_can_delete_mission(&db, mission.mission_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StateConflict);

    // Free the mission by removing the cat (FK sets the reference NULL),
    // then deletion cascades to the targets.
    assert!(db.cat_delete(cat.cat_id).await?);
    services::validate_can_delete_mission(&db, mission.mission_id).await?;
    assert!(db.mission_delete(mission.mission_id).await?);

    for target in targets {
        assert!(db
            .target_get(mission.mission_id, target.target_id)
            .await?
            .is_none());
    }

    Ok(())
}

#[tokio::test]
async fn smoke_test_completion_cascade_and_notes_freeze() -> ApiResult<()> {
    let db = test_db()?;
    db.ensure_schema().await?;

    let (mission, targets) = db.mission_create(&sample_mission(&["T1", "T2"])).await?;
    let mission_id = mission.mission_id;
    let (first, second) = (&targets[0], &targets[1]);

    // Notes are freely editable while everything is incomplete.
    services::validate_can_update_target(&db, mission_id, first.target_id, &notes_update("seen"))
        .await?;
    db.target_update(mission_id, first.target_id, &notes_update("seen"))
        .await?
        .expect("target exists");

    // Completing the first target does not complete the mission.
    db.target_update(mission_id, first.target_id, &completion_update())
        .await?
        .expect("target exists");
    assert!(!services::check_mission_completion(&db, mission_id).await?);

    // The completed target's notes are frozen; its flag stays writable.
    let err = services::validate_can_update_target(
        &db,
        mission_id,
        first.target_id,
        &notes_update("more"),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::StateConflict);
    assert!(err.message.contains("target is already completed"));
    services::validate_can_update_target(&db, mission_id, first.target_id, &completion_update())
        .await?;

    // Completing the last target flips the mission exactly once.
    db.target_update(mission_id, second.target_id, &completion_update())
        .await?
        .expect("target exists");
    assert!(services::check_mission_completion(&db, mission_id).await?);
    assert!(!services::check_mission_completion(&db, mission_id).await?);

    let mission = db.mission_get(mission_id).await?.expect("mission exists");
    assert!(mission.is_completed);

    // Once the mission is completed, notes freeze for every target.
    let err = services::validate_can_update_target(
        &db,
        mission_id,
        second.target_id,
        &notes_update("late"),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::StateConflict);

    // A completed mission no longer accepts a cat.
    let cat = db.cat_create(&sample_cat("smoke-late-cat")).await?;
    let err = services::validate_can_assign_cat(&db, mission_id, cat.cat_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StateConflict);
    assert!(err.message.contains("completed"));

    Ok(())
}

#[tokio::test]
async fn smoke_test_target_scoping() -> ApiResult<()> {
    let db = test_db()?;
    db.ensure_schema().await?;

    let (m1, targets_1) = db.mission_create(&sample_mission(&["T1"])).await?;
    let (m2, _) = db.mission_create(&sample_mission(&["T1"])).await?;

    // A target is invisible through another mission's scope.
    assert!(db
        .target_get(m2.mission_id, targets_1[0].target_id)
        .await?
        .is_none());

    let err = services::validate_can_update_target(
        &db,
        m2.mission_id,
        targets_1[0].target_id,
        &notes_update("cross"),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::TargetNotFound);

    assert!(db
        .target_get(m1.mission_id, targets_1[0].target_id)
        .await?
        .is_some());

    Ok(())
}
