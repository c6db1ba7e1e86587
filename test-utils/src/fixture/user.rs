//! User record fixture.

use chrono::{DateTime, Utc};
use entity::user;

use crate::{
    error::TestError,
    generator::Generator,
    record::{FieldTable, Record},
};

impl Record for user::Model {
    fn fields() -> FieldTable<Self> {
        FieldTable::new()
            .field("discord_id", |m: &mut Self, v: String| m.discord_id = v)
            .field("name", |m: &mut Self, v: String| m.name = v)
            .field("admin", |m: &mut Self, v: bool| m.admin = v)
            .field("last_guild_sync_at", |m: &mut Self, v: DateTime<Utc>| {
                m.last_guild_sync_at = v
            })
            .field("last_role_sync_at", |m: &mut Self, v: DateTime<Utc>| {
                m.last_role_sync_at = v
            })
    }

    /// Generates a user with a numeric Discord ID, matching real snowflakes.
    fn generate(g: &mut Generator) -> Result<Self, TestError> {
        Ok(Self {
            discord_id: g.value::<u64>().to_string(),
            name: g.value(),
            admin: g.value(),
            last_guild_sync_at: g.value(),
            last_role_sync_at: g.value(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::{builder::FakeRepositoryBuilder, record::Overrides};

    #[test]
    fn generates_numeric_discord_ids() -> Result<(), TestError> {
        let repo = FakeRepositoryBuilder::<user::Model>::new()?;

        for user in repo.records() {
            assert!(user.discord_id.parse::<u64>().is_ok());
            assert!(!user.name.is_empty());
        }

        Ok(())
    }

    #[test]
    fn generates_unique_discord_ids() -> Result<(), TestError> {
        let repo = FakeRepositoryBuilder::<user::Model>::with_options(false, 10)?;

        let mut ids: Vec<String> = repo.records().into_iter().map(|u| u.discord_id).collect();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 10);

        Ok(())
    }

    #[test]
    fn overrides_sync_timestamps() -> Result<(), TestError> {
        let synced = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let mut repo = FakeRepositoryBuilder::<user::Model>::with_options(false, 0)?;

        repo.add(
            Overrides::new()
                .with("last_guild_sync_at", synced)
                .with("last_role_sync_at", synced),
        )?;

        let user = &repo.records()[0];
        assert_eq!(user.last_guild_sync_at, synced);
        assert_eq!(user.last_role_sync_at, synced);

        Ok(())
    }
}
