use anyhow::Result;
use async_trait::async_trait;
use shared::{
    new_id, Admin, AdminPatch, NewAdmin, NewTeamMember, NewUser, TeamMember, TeamMemberPatch, User,
    UserPatch,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor};

use crate::storage::sqlite::codec::{
    decode_enum, decode_json, decode_timestamp, encode_json, encode_timestamp, map_unique_violation,
};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::timestamp_now;
use crate::storage::traits::{AdminStorage, TeamMemberStorage, UserStorage};

const TEAM_MEMBER_COLUMNS: &str =
    "id, name, position, description, image_url, social_links, created_at, updated_at";

const ADMIN_COLUMNS: &str = "id, username, password, email, created_at";

const USER_COLUMNS: &str = "id, username, email, password, role, is_approved, created_at";

fn team_member_from_row(row: &SqliteRow) -> Result<TeamMember> {
    Ok(TeamMember {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        position: row.try_get("position")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        social_links: decode_json(row, "team_members", "social_links")?,
        created_at: decode_timestamp(row, "team_members", "created_at")?,
        updated_at: decode_timestamp(row, "team_members", "updated_at")?,
    })
}

fn admin_from_row(row: &SqliteRow) -> Result<Admin> {
    Ok(Admin {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        email: row.try_get("email")?,
        created_at: decode_timestamp(row, "admins", "created_at")?,
    })
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password: row.try_get("password")?,
        role: decode_enum(row, "users", "role")?,
        is_approved: row.try_get("is_approved")?,
        created_at: decode_timestamp(row, "users", "created_at")?,
    })
}

fn taken(username: &str, email: &str) -> String {
    format!("username '{}' or email '{}' is already in use", username, email)
}

async fn insert_user<'e>(executor: impl SqliteExecutor<'e>, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password, role, is_approved, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password)
    .bind(user.role.as_str())
    .bind(user.is_approved)
    .bind(encode_timestamp(&user.created_at))
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, "user", taken(&user.username, &user.email)))?;
    Ok(())
}

#[async_trait]
impl TeamMemberStorage for SqliteStorage {
    async fn list_team_members(&self) -> Result<Vec<TeamMember>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM team_members ORDER BY created_at ASC",
            TEAM_MEMBER_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(team_member_from_row).collect()
    }

    async fn get_team_member(&self, id: &str) -> Result<Option<TeamMember>> {
        let row = sqlx::query(&format!("SELECT {} FROM team_members WHERE id = ?", TEAM_MEMBER_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(team_member_from_row).transpose()
    }

    async fn create_team_member(&self, input: NewTeamMember) -> Result<TeamMember> {
        let member = input.into_team_member(new_id(), timestamp_now());
        sqlx::query(
            r#"
            INSERT INTO team_members (id, name, position, description, image_url, social_links,
                                      created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&member.id)
        .bind(&member.name)
        .bind(&member.position)
        .bind(&member.description)
        .bind(&member.image_url)
        .bind(encode_json(&member.social_links)?)
        .bind(encode_timestamp(&member.created_at))
        .bind(encode_timestamp(&member.updated_at))
        .execute(self.pool())
        .await?;
        Ok(member)
    }

    async fn update_team_member(&self, id: &str, patch: TeamMemberPatch) -> Result<Option<TeamMember>> {
        let Some(mut member) = self.get_team_member(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut member, timestamp_now());

        sqlx::query(
            r#"
            UPDATE team_members
            SET name = ?, position = ?, description = ?, image_url = ?, social_links = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&member.name)
        .bind(&member.position)
        .bind(&member.description)
        .bind(&member.image_url)
        .bind(encode_json(&member.social_links)?)
        .bind(encode_timestamp(&member.updated_at))
        .bind(&member.id)
        .execute(self.pool())
        .await?;

        Ok(Some(member))
    }

    async fn delete_team_member(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AdminStorage for SqliteStorage {
    async fn list_admins(&self) -> Result<Vec<Admin>> {
        let rows = sqlx::query(&format!("SELECT {} FROM admins ORDER BY created_at ASC", ADMIN_COLUMNS))
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(admin_from_row).collect()
    }

    async fn get_admin(&self, id: &str) -> Result<Option<Admin>> {
        let row = sqlx::query(&format!("SELECT {} FROM admins WHERE id = ?", ADMIN_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(admin_from_row).transpose()
    }

    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let row = sqlx::query(&format!("SELECT {} FROM admins WHERE username = ?", ADMIN_COLUMNS))
            .bind(username)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(admin_from_row).transpose()
    }

    async fn create_admin(&self, input: NewAdmin) -> Result<Admin> {
        let admin = input.into_admin(new_id(), timestamp_now());
        sqlx::query("INSERT INTO admins (id, username, password, email, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(&admin.id)
            .bind(&admin.username)
            .bind(&admin.password)
            .bind(&admin.email)
            .bind(encode_timestamp(&admin.created_at))
            .execute(self.pool())
            .await
            .map_err(|e| map_unique_violation(e, "admin", taken(&admin.username, &admin.email)))?;
        Ok(admin)
    }

    async fn update_admin(&self, id: &str, patch: AdminPatch) -> Result<Option<Admin>> {
        let Some(mut admin) = self.get_admin(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut admin);

        sqlx::query("UPDATE admins SET username = ?, password = ?, email = ? WHERE id = ?")
            .bind(&admin.username)
            .bind(&admin.password)
            .bind(&admin.email)
            .bind(&admin.id)
            .execute(self.pool())
            .await
            .map_err(|e| map_unique_violation(e, "admin", taken(&admin.username, &admin.email)))?;

        Ok(Some(admin))
    }

    async fn delete_admin(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM admins WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStorage for SqliteStorage {
    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY created_at ASC", USER_COLUMNS))
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(user_from_row).collect()
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS))
            .bind(username)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn create_user(&self, input: NewUser) -> Result<User> {
        let user = input.into_user(new_id(), timestamp_now());
        insert_user(self.pool(), &user).await?;
        Ok(user)
    }

    async fn bulk_create_users(&self, inputs: Vec<NewUser>) -> Result<Vec<User>> {
        let mut users = Vec::with_capacity(inputs.len());
        for input in inputs {
            let user = input.into_user(new_id(), timestamp_now());
            insert_user(self.pool(), &user).await?;
            users.push(user);
        }
        Ok(users)
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<Option<User>> {
        let Some(mut user) = self.get_user(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut user);

        sqlx::query("UPDATE users SET username = ?, email = ?, password = ?, role = ?, is_approved = ? WHERE id = ?")
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password)
            .bind(user.role.as_str())
            .bind(user.is_approved)
            .bind(&user.id)
            .execute(self.pool())
            .await
            .map_err(|e| map_unique_violation(e, "user", taken(&user.username, &user.email)))?;

        Ok(Some(user))
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn authenticate_user(&self, username: &str, password: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = ? AND password = ? AND is_approved = 1",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(password)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn approve_user(&self, id: &str) -> Result<Option<User>> {
        let result = sqlx::query("UPDATE users SET is_approved = 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user(id).await
    }
}
