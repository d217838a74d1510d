use anyhow::Result;
use async_trait::async_trait;
use shared::{
    MemberDetails, NewRegistrationMember, NewTechfestRegistration, NewTechnofest,
    RegistrationMember, RegistrationMemberPatch, TechfestRegistration, TechfestRegistrationPatch,
    TechfestRegistrationWithCount, Technofest, TechnofestPatch,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection};
use tracing::debug;

use crate::storage::sqlite::codec::{
    check_generated_id, decode_enum, decode_json, decode_timestamp, encode_json, encode_timestamp,
    map_foreign_key_violation, map_unique_violation,
};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::timestamp_now;
use crate::storage::traits::{RegistrationMemberStorage, TechfestRegistrationStorage, TechfestStorage};

const TECHNOFEST_COLUMNS: &str = "id, slug, name, number, category, short_description, description, \
                                  rules, youtube_url, team_min, team_max, spline_right_url, is_active, \
                                  created_at, updated_at";

const TECHNOFEST_ORDER: &str = "ORDER BY number IS NULL, number ASC, name ASC";

const REGISTRATION_COLUMNS: &str =
    "id, technofest_id, team_name, team_leader_name, team_leader_email, contact_email, status, created_at";

const MEMBER_COLUMNS: &str = "id, registration_id, name, email, created_at";

fn technofest_from_row(row: &SqliteRow) -> Result<Technofest> {
    Ok(Technofest {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        number: row.try_get("number")?,
        category: row.try_get("category")?,
        short_description: row.try_get("short_description")?,
        description: row.try_get("description")?,
        rules: decode_json(row, "technofests", "rules")?,
        youtube_url: row.try_get("youtube_url")?,
        team_min: row.try_get("team_min")?,
        team_max: row.try_get("team_max")?,
        spline_right_url: row.try_get("spline_right_url")?,
        is_active: row.try_get("is_active")?,
        created_at: decode_timestamp(row, "technofests", "created_at")?,
        updated_at: decode_timestamp(row, "technofests", "updated_at")?,
    })
}

fn registration_from_row(row: &SqliteRow) -> Result<TechfestRegistration> {
    Ok(TechfestRegistration {
        id: row.try_get("id")?,
        technofest_id: row.try_get("technofest_id")?,
        team_name: row.try_get("team_name")?,
        team_leader_name: row.try_get("team_leader_name")?,
        team_leader_email: row.try_get("team_leader_email")?,
        contact_email: row.try_get("contact_email")?,
        status: decode_enum(row, "techfest_registrations", "status")?,
        created_at: decode_timestamp(row, "techfest_registrations", "created_at")?,
    })
}

fn member_from_row(row: &SqliteRow) -> Result<RegistrationMember> {
    Ok(RegistrationMember {
        id: check_generated_id("registration member", row.try_get("id")?)?,
        registration_id: row.try_get("registration_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        created_at: decode_timestamp(row, "registration_members", "created_at")?,
    })
}

fn slug_taken(slug: &Option<String>) -> String {
    format!("slug {:?} is already in use", slug.as_deref().unwrap_or_default())
}

/// Insert a registration and return it with the id the database generated
async fn insert_registration(
    conn: &mut SqliteConnection,
    input: NewTechfestRegistration,
) -> Result<TechfestRegistration> {
    let now = timestamp_now();
    let status = input.status.unwrap_or_default();
    let row = sqlx::query(
        r#"
        INSERT INTO techfest_registrations (technofest_id, team_name, team_leader_name,
                                            team_leader_email, contact_email, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&input.technofest_id)
    .bind(&input.team_name)
    .bind(&input.team_leader_name)
    .bind(&input.team_leader_email)
    .bind(&input.contact_email)
    .bind(status.as_str())
    .bind(encode_timestamp(&now))
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| map_foreign_key_violation(e, "technofest", &input.technofest_id))?;

    let id = check_generated_id("techfest registration", row.try_get("id")?)?;
    Ok(NewTechfestRegistration {
        status: Some(status),
        ..input
    }
    .into_registration(id, now))
}

/// Insert members with one multi-row statement
async fn insert_members(
    conn: &mut SqliteConnection,
    inputs: Vec<NewRegistrationMember>,
) -> Result<Vec<RegistrationMember>> {
    if inputs.is_empty() {
        return Ok(Vec::new());
    }
    let parent_ids: Vec<String> = inputs.iter().map(|m| m.registration_id.clone()).collect();
    let created_at = encode_timestamp(&timestamp_now());

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO registration_members (registration_id, name, email, created_at) ");
    builder.push_values(inputs, |mut row, member| {
        row.push_bind(member.registration_id)
            .push_bind(member.name)
            .push_bind(member.email)
            .push_bind(created_at.clone());
    });
    builder.push(format!(" RETURNING {}", MEMBER_COLUMNS));

    let rows = builder
        .build()
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| map_foreign_key_violation(e, "techfest registration", &parent_ids.join(", ")))?;

    rows.iter().map(member_from_row).collect()
}

#[async_trait]
impl TechfestStorage for SqliteStorage {
    async fn list_technofests(&self) -> Result<Vec<Technofest>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM technofests {}",
            TECHNOFEST_COLUMNS, TECHNOFEST_ORDER
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(technofest_from_row).collect()
    }

    async fn list_active_technofests(&self) -> Result<Vec<Technofest>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM technofests WHERE is_active = 1 {}",
            TECHNOFEST_COLUMNS, TECHNOFEST_ORDER
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(technofest_from_row).collect()
    }

    async fn list_technofests_by_category(&self, category: &str) -> Result<Vec<Technofest>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM technofests WHERE category = ? {}",
            TECHNOFEST_COLUMNS, TECHNOFEST_ORDER
        ))
        .bind(category)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(technofest_from_row).collect()
    }

    async fn get_technofest(&self, id: &str) -> Result<Option<Technofest>> {
        let row = sqlx::query(&format!("SELECT {} FROM technofests WHERE id = ?", TECHNOFEST_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(technofest_from_row).transpose()
    }

    async fn get_technofest_by_slug(&self, slug: &str) -> Result<Option<Technofest>> {
        let row = sqlx::query(&format!("SELECT {} FROM technofests WHERE slug = ?", TECHNOFEST_COLUMNS))
            .bind(slug)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(technofest_from_row).transpose()
    }

    async fn create_technofest(&self, input: NewTechnofest) -> Result<Technofest> {
        let now = timestamp_now();
        let mut tx = self.pool().begin().await?;
        let row = sqlx::query(
            r#"
            INSERT INTO technofests (slug, name, number, category, short_description, description, rules,
                                     youtube_url, team_min, team_max, spline_right_url, is_active,
                                     created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&input.slug)
        .bind(&input.name)
        .bind(input.number)
        .bind(&input.category)
        .bind(&input.short_description)
        .bind(&input.description)
        .bind(encode_json(&input.rules)?)
        .bind(&input.youtube_url)
        .bind(input.team_min)
        .bind(input.team_max)
        .bind(&input.spline_right_url)
        .bind(input.is_active)
        .bind(encode_timestamp(&now))
        .bind(encode_timestamp(&now))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "technofest", slug_taken(&input.slug)))?;

        let id = check_generated_id("technofest", row.try_get("id")?)?;
        tx.commit().await?;

        Ok(input.into_technofest(id, now))
    }

    async fn update_technofest(&self, id: &str, patch: TechnofestPatch) -> Result<Option<Technofest>> {
        let Some(mut technofest) = self.get_technofest(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut technofest, timestamp_now());

        sqlx::query(
            r#"
            UPDATE technofests
            SET slug = ?, name = ?, number = ?, category = ?, short_description = ?, description = ?,
                rules = ?, youtube_url = ?, team_min = ?, team_max = ?, spline_right_url = ?,
                is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&technofest.slug)
        .bind(&technofest.name)
        .bind(technofest.number)
        .bind(&technofest.category)
        .bind(&technofest.short_description)
        .bind(&technofest.description)
        .bind(encode_json(&technofest.rules)?)
        .bind(&technofest.youtube_url)
        .bind(technofest.team_min)
        .bind(technofest.team_max)
        .bind(&technofest.spline_right_url)
        .bind(technofest.is_active)
        .bind(encode_timestamp(&technofest.updated_at))
        .bind(&technofest.id)
        .execute(self.pool())
        .await
        .map_err(|e| map_unique_violation(e, "technofest", slug_taken(&technofest.slug)))?;

        Ok(Some(technofest))
    }

    async fn delete_technofest(&self, id: &str) -> Result<bool> {
        // Registrations and their members go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM technofests WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TechfestRegistrationStorage for SqliteStorage {
    async fn list_techfest_registrations(&self) -> Result<Vec<TechfestRegistration>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM techfest_registrations ORDER BY created_at DESC",
            REGISTRATION_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(registration_from_row).collect()
    }

    async fn list_techfest_registrations_for_event(&self, technofest_id: &str) -> Result<Vec<TechfestRegistration>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM techfest_registrations WHERE technofest_id = ? ORDER BY created_at DESC",
            REGISTRATION_COLUMNS
        ))
        .bind(technofest_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(registration_from_row).collect()
    }

    async fn list_techfest_registrations_with_team_counts(&self) -> Result<Vec<TechfestRegistrationWithCount>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {},
                   (SELECT COUNT(*) FROM registration_members m WHERE m.registration_id = r.id) + 1
                       AS member_count
            FROM techfest_registrations r
            ORDER BY created_at DESC
            "#,
            REGISTRATION_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| -> Result<TechfestRegistrationWithCount> {
                Ok(TechfestRegistrationWithCount {
                    registration: registration_from_row(row)?,
                    member_count: row.try_get("member_count")?,
                })
            })
            .collect()
    }

    async fn get_techfest_registration(&self, id: &str) -> Result<Option<TechfestRegistration>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM techfest_registrations WHERE id = ?",
            REGISTRATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(registration_from_row).transpose()
    }

    async fn create_techfest_registration(&self, input: NewTechfestRegistration) -> Result<TechfestRegistration> {
        let mut tx = self.pool().begin().await?;
        let registration = insert_registration(&mut tx, input).await?;
        tx.commit().await?;
        Ok(registration)
    }

    async fn create_techfest_registration_with_members(
        &self,
        input: NewTechfestRegistration,
        members: Vec<MemberDetails>,
    ) -> Result<(TechfestRegistration, Vec<RegistrationMember>)> {
        let mut tx = self.pool().begin().await?;
        let registration = insert_registration(&mut tx, input).await?;
        let members = members
            .into_iter()
            .map(|details| NewRegistrationMember::for_registration(&registration.id, details))
            .collect();
        let members = insert_members(&mut tx, members).await?;
        tx.commit().await?;

        debug!(
            "Registered team {} with {} additional members",
            registration.team_name,
            members.len()
        );
        Ok((registration, members))
    }

    async fn update_techfest_registration(
        &self,
        id: &str,
        patch: TechfestRegistrationPatch,
    ) -> Result<Option<TechfestRegistration>> {
        let Some(mut registration) = self.get_techfest_registration(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut registration);

        sqlx::query(
            r#"
            UPDATE techfest_registrations
            SET team_name = ?, team_leader_name = ?, team_leader_email = ?, contact_email = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&registration.team_name)
        .bind(&registration.team_leader_name)
        .bind(&registration.team_leader_email)
        .bind(&registration.contact_email)
        .bind(registration.status.as_str())
        .bind(&registration.id)
        .execute(self.pool())
        .await?;

        Ok(Some(registration))
    }

    async fn delete_techfest_registration(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM techfest_registrations WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RegistrationMemberStorage for SqliteStorage {
    async fn list_all_registration_members(&self) -> Result<Vec<RegistrationMember>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM registration_members ORDER BY created_at ASC",
            MEMBER_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(member_from_row).collect()
    }

    async fn list_registration_members(&self, registration_id: &str) -> Result<Vec<RegistrationMember>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM registration_members WHERE registration_id = ? ORDER BY created_at ASC",
            MEMBER_COLUMNS
        ))
        .bind(registration_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(member_from_row).collect()
    }

    async fn get_registration_member(&self, id: &str) -> Result<Option<RegistrationMember>> {
        let row = sqlx::query(&format!("SELECT {} FROM registration_members WHERE id = ?", MEMBER_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(member_from_row).transpose()
    }

    async fn create_registration_member(&self, input: NewRegistrationMember) -> Result<RegistrationMember> {
        let mut conn = self.pool().acquire().await?;
        let mut members = insert_members(&mut conn, vec![input]).await?;
        members
            .pop()
            .ok_or_else(|| anyhow::anyhow!("insert into registration_members returned no row"))
    }

    async fn bulk_create_registration_members(
        &self,
        inputs: Vec<NewRegistrationMember>,
    ) -> Result<Vec<RegistrationMember>> {
        let mut conn = self.pool().acquire().await?;
        insert_members(&mut conn, inputs).await
    }

    async fn update_registration_member(
        &self,
        id: &str,
        patch: RegistrationMemberPatch,
    ) -> Result<Option<RegistrationMember>> {
        let Some(mut member) = self.get_registration_member(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut member);

        sqlx::query("UPDATE registration_members SET name = ?, email = ? WHERE id = ?")
            .bind(&member.name)
            .bind(&member.email)
            .bind(&member.id)
            .execute(self.pool())
            .await?;

        Ok(Some(member))
    }

    async fn delete_registration_member(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM registration_members WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
