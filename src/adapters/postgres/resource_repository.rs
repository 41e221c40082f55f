//! PostgreSQL implementation of ResourceRepository.
//!
//! Resources live in `resources`; confirmed members and pending requests
//! live in `resource_members`, distinguished by `status`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, ResourceId, Timestamp, UserId};
use crate::domain::resource::{Member, Resource, ResourceKind};
use crate::ports::ResourceRepository;

const STATUS_MEMBER: &str = "member";
const STATUS_REQUEST: &str = "request";

/// PostgreSQL implementation of the ResourceRepository port.
pub struct PostgresResourceRepository {
    pool: PgPool,
}

impl PostgresResourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_members(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<MemberRow>>, DomainError> {
        let rows: Vec<MemberRow> = sqlx::query_as(
            r#"
            SELECT resource_id, user_id, display_name, email, status
            FROM resource_members
            WHERE resource_id = ANY($1)
            ORDER BY position
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load members", e))?;

        let mut grouped: HashMap<Uuid, Vec<MemberRow>> = HashMap::new();
        for row in rows {
            grouped.entry(row.resource_id).or_default().push(row);
        }
        Ok(grouped)
    }
}

/// Database row representation of a resource.
#[derive(Debug, sqlx::FromRow)]
struct ResourceRow {
    id: Uuid,
    kind: String,
    title: String,
    short: String,
    description: String,
    owner_id: String,
    owner_name: String,
    owner_email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    resource_id: Uuid,
    user_id: String,
    display_name: String,
    email: String,
    status: String,
}

impl TryFrom<MemberRow> for Member {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Member::new(parse_user_id(row.user_id)?, row.display_name, row.email))
    }
}

fn into_resource(row: ResourceRow, members: Vec<MemberRow>) -> Result<Resource, DomainError> {
    let kind: ResourceKind = row.kind.parse().map_err(|_| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid kind value: {}", row.kind))
    })?;

    let mut confirmed = Vec::new();
    let mut requests = Vec::new();
    for member_row in members {
        let is_request = member_row.status == STATUS_REQUEST;
        let member = Member::try_from(member_row)?;
        if is_request {
            requests.push(member);
        } else {
            confirmed.push(member);
        }
    }

    Ok(Resource {
        id: ResourceId::from_uuid(row.id),
        kind,
        title: row.title,
        short: row.short,
        description: row.description,
        owner: Member::new(parse_user_id(row.owner_id)?, row.owner_name, row.owner_email),
        members: confirmed,
        requests,
        created_at: Timestamp::from_datetime(row.created_at),
        updated_at: Timestamp::from_datetime(row.updated_at),
    })
}

fn parse_user_id(raw: String) -> Result<UserId, DomainError> {
    UserId::new(raw).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
    })
}

fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, err))
}

async fn insert_members(
    tx: &mut Transaction<'_, Postgres>,
    resource: &Resource,
) -> Result<(), DomainError> {
    let entries = resource
        .members
        .iter()
        .map(|m| (m, STATUS_MEMBER))
        .chain(resource.requests.iter().map(|m| (m, STATUS_REQUEST)));

    for (position, (member, status)) in entries.enumerate() {
        sqlx::query(
            r#"
            INSERT INTO resource_members (resource_id, user_id, display_name, email, status, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(resource.id.as_uuid())
        .bind(member.user_id.as_str())
        .bind(&member.display_name)
        .bind(&member.email)
        .bind(status)
        .bind(position as i32)
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error("Failed to save member", e))?;
    }
    Ok(())
}

#[async_trait]
impl ResourceRepository for PostgresResourceRepository {
    async fn save(&self, resource: &Resource) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO resources (
                id, kind, title, short, description,
                owner_id, owner_name, owner_email, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                short = EXCLUDED.short,
                description = EXCLUDED.description,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(resource.id.as_uuid())
        .bind(resource.kind.as_str())
        .bind(&resource.title)
        .bind(&resource.short)
        .bind(&resource.description)
        .bind(resource.owner.user_id.as_str())
        .bind(&resource.owner.display_name)
        .bind(&resource.owner.email)
        .bind(resource.created_at.as_datetime())
        .bind(resource.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to save resource", e))?;

        sqlx::query("DELETE FROM resource_members WHERE resource_id = $1")
            .bind(resource.id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to clear members", e))?;

        insert_members(&mut tx, resource).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit resource", e))?;
        Ok(())
    }

    async fn find(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> Result<Option<Resource>, DomainError> {
        let row: Option<ResourceRow> = sqlx::query_as(
            r#"
            SELECT id, kind, title, short, description,
                   owner_id, owner_name, owner_email, created_at, updated_at
            FROM resources
            WHERE id = $1 AND kind = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find resource", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut members = self.load_members(&[row.id]).await?;
        let members = members.remove(&row.id).unwrap_or_default();
        into_resource(row, members).map(Some)
    }

    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>, DomainError> {
        let rows: Vec<ResourceRow> = sqlx::query_as(
            r#"
            SELECT id, kind, title, short, description,
                   owner_id, owner_name, owner_email, created_at, updated_at
            FROM resources
            WHERE kind = $1
            ORDER BY title
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list resources", e))?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut members = self.load_members(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let row_members = members.remove(&row.id).unwrap_or_default();
                into_resource(row, row_members)
            })
            .collect()
    }

    async fn delete(&self, kind: ResourceKind, id: &ResourceId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1 AND kind = $2")
            .bind(id.as_uuid())
            .bind(kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete resource", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str) -> ResourceRow {
        let now = Utc::now();
        ResourceRow {
            id: Uuid::new_v4(),
            kind: kind.to_string(),
            title: "Acme".to_string(),
            short: String::new(),
            description: String::new(),
            owner_id: "owner".to_string(),
            owner_name: "Owner".to_string(),
            owner_email: "owner@example.com".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn member_row(resource_id: Uuid, user: &str, status: &str) -> MemberRow {
        MemberRow {
            resource_id,
            user_id: user.to_string(),
            display_name: user.to_string(),
            email: format!("{user}@example.com"),
            status: status.to_string(),
        }
    }

    #[test]
    fn splits_members_and_requests() {
        let row = row("org");
        let id = row.id;
        let resource = into_resource(
            row,
            vec![
                member_row(id, "owner", STATUS_MEMBER),
                member_row(id, "dev", STATUS_REQUEST),
            ],
        )
        .unwrap();

        assert_eq!(resource.kind, ResourceKind::Org);
        assert_eq!(resource.members.len(), 1);
        assert_eq!(resource.requests[0].user_id.as_str(), "dev");
    }

    #[test]
    fn unknown_kind_is_a_database_error() {
        let err = into_resource(row("widget"), Vec::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
