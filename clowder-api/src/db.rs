//! PostgreSQL record store
//!
//! Connection pooling via deadpool-postgres plus the plain-SQL operations
//! for the three agency tables (cats, missions, targets). No business
//! rules live here: invariants belong to the service layer, and the only
//! guarded statements are the single-row state transitions (assignment and
//! completion) that must resolve races at the database.

use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use std::collections::HashMap;
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

use crate::error::{ApiError, ApiResult};
use crate::types::{CreateCatRequest, CreateMissionRequest, UpdateTargetRequest};
use clowder_core::{Cat, CatId, Mission, MissionId, Target, TargetId};

// ============================================================================
// SCHEMA
// ============================================================================

/// Schema bootstrap executed at startup. `cat_id` on missions is UNIQUE so
/// the one-mission-per-cat rule also holds at the storage layer, and targets
/// are dropped together with their mission.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS cats (
    cat_id              BIGSERIAL PRIMARY KEY,
    name                TEXT NOT NULL,
    years_of_experience INTEGER NOT NULL,
    breed               TEXT NOT NULL,
    salary              DOUBLE PRECISION NOT NULL,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS missions (
    mission_id   BIGSERIAL PRIMARY KEY,
    cat_id       BIGINT UNIQUE REFERENCES cats(cat_id) ON DELETE SET NULL,
    is_completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS targets (
    target_id    BIGSERIAL PRIMARY KEY,
    mission_id   BIGINT NOT NULL REFERENCES missions(mission_id) ON DELETE CASCADE,
    name         TEXT NOT NULL,
    country      TEXT NOT NULL,
    notes        TEXT NOT NULL DEFAULT '',
    is_completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS targets_mission_id_idx ON targets (mission_id);
";

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Connection settings for the agency database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    /// Upper bound on pooled connections
    pub max_size: usize,
    /// How long to wait for a free connection
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "clowder".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Read connection settings from `CLOWDER_DB_*` environment variables,
    /// falling back to the development defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("CLOWDER_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("CLOWDER_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("CLOWDER_DB_NAME").unwrap_or_else(|_| "clowder".to_string()),
            user: std::env::var("CLOWDER_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("CLOWDER_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("CLOWDER_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("CLOWDER_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Build the deadpool pool described by these settings.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn cat_from_row(row: &Row) -> Cat {
    Cat {
        cat_id: row.get("cat_id"),
        name: row.get("name"),
        years_of_experience: row.get("years_of_experience"),
        breed: row.get("breed"),
        salary: row.get("salary"),
        created_at: row.get("created_at"),
    }
}

fn mission_from_row(row: &Row) -> Mission {
    Mission {
        mission_id: row.get("mission_id"),
        cat_id: row.get("cat_id"),
        is_completed: row.get("is_completed"),
        created_at: row.get("created_at"),
    }
}

fn target_from_row(row: &Row) -> Target {
    Target {
        target_id: row.get("target_id"),
        mission_id: row.get("mission_id"),
        name: row.get("name"),
        country: row.get("country"),
        notes: row.get("notes"),
        is_completed: row.get("is_completed"),
        created_at: row.get("created_at"),
    }
}

/// A mission with its loaded relations, as returned by the read paths that
/// feed `MissionResponse`.
#[derive(Debug, Clone)]
pub struct MissionRecord {
    pub mission: Mission,
    pub targets: Vec<Target>,
    pub cat: Option<Cat>,
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Handle on the connection pool exposing one method per table operation.
/// Cloning is cheap; every route state holds its own copy.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Current pool size, for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> ApiResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Create the agency tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.batch_execute(SCHEMA_SQL).await?;
        Ok(())
    }

    /// Round-trip to the database, for readiness checks.
    pub async fn ping(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    // ========================================================================
    // CAT OPERATIONS
    // ========================================================================

    /// Insert a new cat. The breed is expected to be validated already.
    pub async fn cat_create(&self, req: &CreateCatRequest) -> ApiResult<Cat> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_one(
                "INSERT INTO cats (name, years_of_experience, breed, salary) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING cat_id, name, years_of_experience, breed, salary, created_at",
                &[&req.name, &req.years_of_experience, &req.breed, &req.salary],
            )
            .await?;

        Ok(cat_from_row(&row))
    }

    /// Get a cat by ID.
    pub async fn cat_get(&self, id: CatId) -> ApiResult<Option<Cat>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                "SELECT cat_id, name, years_of_experience, breed, salary, created_at \
                 FROM cats WHERE cat_id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(cat_from_row))
    }

    /// List cats with offset/limit pagination, in id order.
    pub async fn cat_list(&self, skip: i64, limit: i64) -> ApiResult<Vec<Cat>> {
        let conn = self.get_conn().await?;

        let rows = conn
            .query(
                "SELECT cat_id, name, years_of_experience, breed, salary, created_at \
                 FROM cats ORDER BY cat_id LIMIT $1 OFFSET $2",
                &[&limit, &skip],
            )
            .await?;

        Ok(rows.iter().map(cat_from_row).collect())
    }

    /// Update a cat's salary. Returns the updated row, or None if absent.
    pub async fn cat_update_salary(&self, id: CatId, salary: f64) -> ApiResult<Option<Cat>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                "UPDATE cats SET salary = $2 WHERE cat_id = $1 \
                 RETURNING cat_id, name, years_of_experience, breed, salary, created_at",
                &[&id, &salary],
            )
            .await?;

        Ok(row.as_ref().map(cat_from_row))
    }

    /// Delete a cat. Returns whether a row was removed. A mission that
    /// referenced the cat is left unassigned (FK is ON DELETE SET NULL).
    pub async fn cat_delete(&self, id: CatId) -> ApiResult<bool> {
        let conn = self.get_conn().await?;

        let affected = conn
            .execute("DELETE FROM cats WHERE cat_id = $1", &[&id])
            .await?;

        Ok(affected > 0)
    }

    // ========================================================================
    // MISSION OPERATIONS
    // ========================================================================

    /// Create a mission and its targets as one transaction.
    ///
    /// The target-count bounds are enforced at the boundary; this method
    /// inserts whatever it is given atomically.
    pub async fn mission_create(
        &self,
        req: &CreateMissionRequest,
    ) -> ApiResult<(Mission, Vec<Target>)> {
        let mut conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        let row = tx
            .query_one(
                "INSERT INTO missions DEFAULT VALUES \
                 RETURNING mission_id, cat_id, is_completed, created_at",
                &[],
            )
            .await?;
        let mission = mission_from_row(&row);

        let mut targets = Vec::with_capacity(req.targets.len());
        for target in &req.targets {
            let row = tx
                .query_one(
                    "INSERT INTO targets (mission_id, name, country) \
                     VALUES ($1, $2, $3) \
                     RETURNING target_id, mission_id, name, country, notes, \
                               is_completed, created_at",
                    &[&mission.mission_id, &target.name, &target.country],
                )
                .await?;
            targets.push(target_from_row(&row));
        }

        tx.commit().await?;
        Ok((mission, targets))
    }

    /// Get a mission row by ID, without relations.
    pub async fn mission_get(&self, id: MissionId) -> ApiResult<Option<Mission>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                "SELECT mission_id, cat_id, is_completed, created_at \
                 FROM missions WHERE mission_id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(mission_from_row))
    }

    /// Get a mission with its targets and assigned cat, if any.
    pub async fn mission_get_full(&self, id: MissionId) -> ApiResult<Option<MissionRecord>> {
        let conn = self.get_conn().await?;

        let Some(row) = conn
            .query_opt(
                "SELECT mission_id, cat_id, is_completed, created_at \
                 FROM missions WHERE mission_id = $1",
                &[&id],
            )
            .await?
        else {
            return Ok(None);
        };
        let mission = mission_from_row(&row);

        let target_rows = conn
            .query(
                "SELECT target_id, mission_id, name, country, notes, is_completed, created_at \
                 FROM targets WHERE mission_id = $1 ORDER BY target_id",
                &[&id],
            )
            .await?;
        let targets = target_rows.iter().map(target_from_row).collect();

        let cat = match mission.cat_id {
            Some(cat_id) => {
                let cat_row = conn
                    .query_opt(
                        "SELECT cat_id, name, years_of_experience, breed, salary, created_at \
                         FROM cats WHERE cat_id = $1",
                        &[&cat_id],
                    )
                    .await?;
                cat_row.as_ref().map(cat_from_row)
            }
            None => None,
        };

        Ok(Some(MissionRecord {
            mission,
            targets,
            cat,
        }))
    }

    /// List missions with their relations, offset/limit paginated.
    pub async fn mission_list(&self, skip: i64, limit: i64) -> ApiResult<Vec<MissionRecord>> {
        let conn = self.get_conn().await?;

        let rows = conn
            .query(
                "SELECT mission_id, cat_id, is_completed, created_at \
                 FROM missions ORDER BY mission_id LIMIT $1 OFFSET $2",
                &[&limit, &skip],
            )
            .await?;
        let missions: Vec<Mission> = rows.iter().map(mission_from_row).collect();

        if missions.is_empty() {
            return Ok(Vec::new());
        }

        let mission_ids: Vec<MissionId> = missions.iter().map(|m| m.mission_id).collect();
        let target_rows = conn
            .query(
                "SELECT target_id, mission_id, name, country, notes, is_completed, created_at \
                 FROM targets WHERE mission_id = ANY($1) ORDER BY target_id",
                &[&mission_ids],
            )
            .await?;

        let mut targets_by_mission: HashMap<MissionId, Vec<Target>> = HashMap::new();
        for row in &target_rows {
            let target = target_from_row(row);
            targets_by_mission
                .entry(target.mission_id)
                .or_default()
                .push(target);
        }

        let cat_ids: Vec<CatId> = missions.iter().filter_map(|m| m.cat_id).collect();
        let mut cats_by_id: HashMap<CatId, Cat> = HashMap::new();
        if !cat_ids.is_empty() {
            let cat_rows = conn
                .query(
                    "SELECT cat_id, name, years_of_experience, breed, salary, created_at \
                     FROM cats WHERE cat_id = ANY($1)",
                    &[&cat_ids],
                )
                .await?;
            for row in &cat_rows {
                let cat = cat_from_row(row);
                cats_by_id.insert(cat.cat_id, cat);
            }
        }

        Ok(missions
            .into_iter()
            .map(|mission| {
                let targets = targets_by_mission
                    .remove(&mission.mission_id)
                    .unwrap_or_default();
                let cat = mission.cat_id.and_then(|id| cats_by_id.get(&id).cloned());
                MissionRecord {
                    mission,
                    targets,
                    cat,
                }
            })
            .collect())
    }

    /// Delete a mission. Targets cascade at the database. Returns whether
    /// a row was removed.
    pub async fn mission_delete(&self, id: MissionId) -> ApiResult<bool> {
        let conn = self.get_conn().await?;

        let affected = conn
            .execute("DELETE FROM missions WHERE mission_id = $1", &[&id])
            .await?;

        Ok(affected > 0)
    }

    /// Assign a cat to a mission.
    ///
    /// The statement only matches an unassigned, incomplete mission, so a
    /// racing assignment resolves here: exactly one request wins. Returns
    /// whether the assignment was written.
    pub async fn mission_assign_cat(&self, id: MissionId, cat_id: CatId) -> ApiResult<bool> {
        let conn = self.get_conn().await?;

        let affected = conn
            .execute(
                "UPDATE missions SET cat_id = $2 \
                 WHERE mission_id = $1 AND cat_id IS NULL AND NOT is_completed",
                &[&id, &cat_id],
            )
            .await?;

        Ok(affected > 0)
    }

    /// Find the mission currently referencing a cat, if any.
    pub async fn mission_find_by_cat(&self, cat_id: CatId) -> ApiResult<Option<Mission>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                "SELECT mission_id, cat_id, is_completed, created_at \
                 FROM missions WHERE cat_id = $1",
                &[&cat_id],
            )
            .await?;

        Ok(row.as_ref().map(mission_from_row))
    }

    /// Flip a mission's completion flag false -> true.
    ///
    /// The guard makes the transition happen at most once; a mission that
    /// is already completed matches no row. Returns whether a transition
    /// occurred.
    pub async fn mission_mark_completed(&self, id: MissionId) -> ApiResult<bool> {
        let conn = self.get_conn().await?;

        let affected = conn
            .execute(
                "UPDATE missions SET is_completed = TRUE \
                 WHERE mission_id = $1 AND NOT is_completed",
                &[&id],
            )
            .await?;

        Ok(affected > 0)
    }

    // ========================================================================
    // TARGET OPERATIONS
    // ========================================================================

    /// Get a target scoped to its mission. A target that exists under a
    /// different mission is reported as absent.
    pub async fn target_get(
        &self,
        mission_id: MissionId,
        target_id: TargetId,
    ) -> ApiResult<Option<Target>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                "SELECT target_id, mission_id, name, country, notes, is_completed, created_at \
                 FROM targets WHERE target_id = $2 AND mission_id = $1",
                &[&mission_id, &target_id],
            )
            .await?;

        Ok(row.as_ref().map(target_from_row))
    }

    /// List the targets owned by a mission, in id order.
    pub async fn targets_for_mission(&self, mission_id: MissionId) -> ApiResult<Vec<Target>> {
        let conn = self.get_conn().await?;

        let rows = conn
            .query(
                "SELECT target_id, mission_id, name, country, notes, is_completed, created_at \
                 FROM targets WHERE mission_id = $1 ORDER BY target_id",
                &[&mission_id],
            )
            .await?;

        Ok(rows.iter().map(target_from_row).collect())
    }

    /// Apply a partial target update. Omitted fields keep their value.
    /// Returns the updated row, or None if absent.
    pub async fn target_update(
        &self,
        mission_id: MissionId,
        target_id: TargetId,
        req: &UpdateTargetRequest,
    ) -> ApiResult<Option<Target>> {
        let conn = self.get_conn().await?;

        let row = conn
            .query_opt(
                "UPDATE targets SET \
                     notes = COALESCE($3, notes), \
                     is_completed = COALESCE($4, is_completed) \
                 WHERE target_id = $2 AND mission_id = $1 \
                 RETURNING target_id, mission_id, name, country, notes, \
                           is_completed, created_at",
                &[&mission_id, &target_id, &req.notes, &req.is_completed],
            )
            .await?;

        Ok(row.as_ref().map(target_from_row))
    }
}
