//! PostgreSQL player store
//!
//! Specifications are translated into parameterised SQL with
//! [`sqlx::QueryBuilder`]; every value is bound, never interpolated.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::error::{RepositoryError, RepositoryOperation};
use super::filter::{FilterCondition, FilterOperator, FilterValue, Predicate, Specification};
use super::pagination::Pagination;
use super::traits::{PlayerRepository, RepositoryResult};
use crate::ids::PlayerId;
use crate::players::{Player, PlayerField, PlayerOrder, Profession, Race};

const COLUMNS: &str =
    "id, name, title, race, profession, experience, level, until_next_level, birthday, banned";

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS player (
    id               BIGSERIAL PRIMARY KEY,
    name             VARCHAR(12)  NOT NULL,
    title            VARCHAR(30)  NOT NULL,
    race             TEXT         NOT NULL,
    profession       TEXT         NOT NULL,
    experience       BIGINT       NOT NULL,
    level            INTEGER      NOT NULL,
    until_next_level BIGINT       NOT NULL,
    birthday         TIMESTAMPTZ  NOT NULL,
    banned           BOOLEAN      NOT NULL DEFAULT FALSE
)
"#;

type PlayerRow = (
    i64,
    String,
    String,
    String,
    String,
    i64,
    i32,
    i64,
    DateTime<Utc>,
    bool,
);

/// Player store backed by a `player` table
#[derive(Debug, Clone)]
pub struct PgPlayerRepository {
    pool: PgPool,
}

impl PgPlayerRepository {
    /// Wrap an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `player` table if it does not exist yet
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::EnsureSchema, e))?;
        tracing::info!("Player table ready");
        Ok(())
    }
}

fn row_to_player(operation: RepositoryOperation, row: PlayerRow) -> RepositoryResult<Player> {
    let (id, name, title, race, profession, experience, level, until_next_level, birthday, banned) =
        row;

    let decode = |message: String| {
        RepositoryError::serialization_error(operation, message).with_entity("Player", id.to_string())
    };

    Ok(Player {
        id: Some(PlayerId::new(id).map_err(|e| decode(e.to_string()))?),
        name,
        title,
        race: race.parse::<Race>().map_err(|e| decode(e.to_string()))?,
        profession: profession
            .parse::<Profession>()
            .map_err(|e| decode(e.to_string()))?,
        experience,
        level,
        until_next_level,
        birthday,
        banned,
    })
}

/// Escape `LIKE` metacharacters so the needle matches literally
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::String(s) => {
            builder.push_bind(s.clone());
        }
        FilterValue::Integer(n) => {
            builder.push_bind(*n);
        }
        FilterValue::Boolean(b) => {
            builder.push_bind(*b);
        }
        FilterValue::Timestamp(t) => {
            builder.push_bind(*t);
        }
        FilterValue::Range(low, high) => {
            push_value(builder, low);
            builder.push(" AND ");
            push_value(builder, high);
        }
    }
}

fn push_condition(builder: &mut QueryBuilder<'static, Postgres>, condition: &FilterCondition) {
    builder.push(condition.field.column());
    builder.push(format!(" {} ", condition.operator));

    match (condition.operator, &condition.value) {
        (FilterOperator::Contains, FilterValue::String(needle)) => {
            builder.push_bind(format!("%{}%", escape_like(needle)));
        }
        (_, value) => push_value(builder, value),
    }
}

fn push_where(builder: &mut QueryBuilder<'static, Postgres>, spec: &Specification) {
    builder.push(" WHERE ");
    if spec.predicates().is_empty() {
        builder.push("TRUE");
        return;
    }

    let mut separated = false;
    for predicate in spec.predicates() {
        if separated {
            builder.push(" AND ");
        }
        separated = true;
        match predicate {
            Predicate::Unconstrained => {
                builder.push("TRUE");
            }
            Predicate::Where(condition) => push_condition(builder, condition),
        }
    }
}

fn to_sql_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

pub(crate) fn select_query(
    spec: &Specification,
    order: Option<PlayerOrder>,
    pagination: Option<Pagination>,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM player", COLUMNS));
    push_where(&mut builder, spec);

    let field = order.map_or(PlayerField::Id, |o| o.field());
    builder.push(" ORDER BY ");
    builder.push(field.column());
    // Byte order, matching the in-memory store regardless of database locale
    if matches!(field, PlayerField::Name | PlayerField::Title) {
        builder.push(r#" COLLATE "C""#);
    }
    if field != PlayerField::Id {
        builder.push(", id");
    }

    if let Some(pagination) = pagination {
        builder.push(" LIMIT ");
        builder.push_bind(to_sql_i64(pagination.limit));
        builder.push(" OFFSET ");
        builder.push_bind(to_sql_i64(pagination.offset));
    }

    builder
}

pub(crate) fn count_query(spec: &Specification) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM player");
    push_where(&mut builder, spec);
    builder
}

impl PlayerRepository for PgPlayerRepository {
    const BACKEND: &'static str = "postgres";

    async fn find_by_id(&self, id: PlayerId) -> RepositoryResult<Option<Player>> {
        let row = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {} FROM player WHERE id = $1",
            COLUMNS
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::FindById, e))?;

        row.map(|r| row_to_player(RepositoryOperation::FindById, r))
            .transpose()
    }

    async fn exists(&self, id: PlayerId) -> RepositoryResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM player WHERE id = $1)"#)
                .bind(id.get())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Exists, e))?;

        Ok(exists)
    }

    async fn save(&self, player: Player) -> RepositoryResult<Player> {
        match player.id {
            None => {
                let row = sqlx::query_as::<_, PlayerRow>(&format!(
                    r#"
                    INSERT INTO player
                        (name, title, race, profession, experience, level, until_next_level, birthday, banned)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    RETURNING {}
                    "#,
                    COLUMNS
                ))
                .bind(&player.name)
                .bind(&player.title)
                .bind(player.race.as_str())
                .bind(player.profession.as_str())
                .bind(player.experience)
                .bind(player.level)
                .bind(player.until_next_level)
                .bind(player.birthday)
                .bind(player.banned)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Create, e))?;

                row_to_player(RepositoryOperation::Create, row)
            }
            Some(id) => {
                let row = sqlx::query_as::<_, PlayerRow>(&format!(
                    r#"
                    UPDATE player
                    SET name = $2, title = $3, race = $4, profession = $5, experience = $6,
                        level = $7, until_next_level = $8, birthday = $9, banned = $10
                    WHERE id = $1
                    RETURNING {}
                    "#,
                    COLUMNS
                ))
                .bind(id.get())
                .bind(&player.name)
                .bind(&player.title)
                .bind(player.race.as_str())
                .bind(player.profession.as_str())
                .bind(player.experience)
                .bind(player.level)
                .bind(player.until_next_level)
                .bind(player.birthday)
                .bind(player.banned)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Update, e))?
                .ok_or_else(|| {
                    RepositoryError::not_found(RepositoryOperation::Update, "Player", id.to_string())
                })?;

                row_to_player(RepositoryOperation::Update, row)
            }
        }
    }

    async fn delete(&self, id: PlayerId) -> RepositoryResult<bool> {
        let result = sqlx::query(r#"DELETE FROM player WHERE id = $1"#)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Delete, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_page(
        &self,
        spec: &Specification,
        order: PlayerOrder,
        pagination: Pagination,
    ) -> RepositoryResult<Vec<Player>> {
        let mut builder = select_query(spec, Some(order), Some(pagination));
        let rows = builder
            .build_query_as::<PlayerRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::FindPage, e))?;

        rows.into_iter()
            .map(|r| row_to_player(RepositoryOperation::FindPage, r))
            .collect()
    }

    async fn find_all(&self, spec: &Specification) -> RepositoryResult<Vec<Player>> {
        let mut builder = select_query(spec, None, None);
        let rows = builder
            .build_query_as::<PlayerRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::FindAll, e))?;

        rows.into_iter()
            .map(|r| row_to_player(RepositoryOperation::FindAll, r))
            .collect()
    }

    async fn count(&self, spec: &Specification) -> RepositoryResult<u64> {
        let mut builder = count_query(spec);
        let (count,): (i64,) = builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Count, e))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
