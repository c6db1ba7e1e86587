//! Fleet record fixture.

use chrono::{DateTime, Utc};
use entity::fleet;

use crate::{
    error::TestError,
    generator::Generator,
    record::{FieldTable, Record},
};

impl Record for fleet::Model {
    fn fields() -> FieldTable<Self> {
        FieldTable::new()
            .field("id", |m: &mut Self, v: i32| m.id = v)
            .field("category_id", |m: &mut Self, v: i32| m.category_id = v)
            .field("name", |m: &mut Self, v: String| m.name = v)
            .field("commander_id", |m: &mut Self, v: String| m.commander_id = v)
            .field("fleet_time", |m: &mut Self, v: DateTime<Utc>| m.fleet_time = v)
            .field("description", |m: &mut Self, v: Option<String>| m.description = v)
            .field("hidden", |m: &mut Self, v: bool| m.hidden = v)
            .field("disable_reminder", |m: &mut Self, v: bool| m.disable_reminder = v)
            .field("created_at", |m: &mut Self, v: DateTime<Utc>| m.created_at = v)
    }

    fn generate(g: &mut Generator) -> Result<Self, TestError> {
        Ok(Self {
            id: g.value(),
            category_id: g.value(),
            name: g.value(),
            commander_id: g.value::<u64>().to_string(),
            fleet_time: g.value(),
            description: g.value(),
            hidden: g.value(),
            disable_reminder: g.value(),
            created_at: g.value(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::FakeRepositoryBuilder, record::Overrides};
    use fakerepo::{DbContext, Repository};

    /// Upcoming visible fleets in a category, as a service would compute them.
    fn upcoming_in_category(
        repo: &dyn fakerepo::AnalyticsRepository<fleet::Model>,
        category_id: i32,
        now: DateTime<Utc>,
    ) -> Vec<fleet::Model> {
        repo.get()
            .into_iter()
            .filter(|f| f.category_id == category_id && !f.hidden && f.fleet_time > now)
            .collect()
    }

    #[test]
    fn ids_are_unique_across_generated_fleets() -> Result<(), TestError> {
        let repo = FakeRepositoryBuilder::<fleet::Model>::with_options(false, 5)?;

        let mut ids: Vec<i32> = repo.records().into_iter().map(|f| f.id).collect();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 5);

        Ok(())
    }

    #[test]
    fn serves_overridden_fleets_to_service() -> Result<(), TestError> {
        let now = Utc::now();
        let mut repo = FakeRepositoryBuilder::<fleet::Model>::with_options(false, 0)?;

        repo.add(
            Overrides::new()
                .with("category_id", 1)
                .with("hidden", false)
                .with("fleet_time", now + chrono::TimeDelta::hours(2)),
        )?
        .add(
            Overrides::new()
                .with("category_id", 1)
                .with("hidden", true)
                .with("fleet_time", now + chrono::TimeDelta::hours(3)),
        )?
        .add(
            Overrides::new()
                .with("category_id", 2)
                .with("hidden", false)
                .with("fleet_time", now + chrono::TimeDelta::hours(4)),
        )?;

        let analytics = repo.analytics()?;
        let upcoming = upcoming_in_category(analytics.as_ref(), 1, now);

        assert_eq!(upcoming.len(), 1);
        assert!(!upcoming[0].hidden);
        assert!(repo.is_finalized(DbContext::Analytics));

        Ok(())
    }
}
