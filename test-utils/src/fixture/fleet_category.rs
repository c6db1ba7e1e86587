//! Fleet category record fixture.

use entity::fleet_category;

use crate::{
    error::TestError,
    generator::Generator,
    record::{FieldTable, Record},
};

impl Record for fleet_category::Model {
    fn fields() -> FieldTable<Self> {
        FieldTable::new()
            .field("id", |m: &mut Self, v: i32| m.id = v)
            .field("guild_id", |m: &mut Self, v: String| m.guild_id = v)
            .field("ping_format_id", |m: &mut Self, v: i32| m.ping_format_id = v)
            .field("ping_group_id", |m: &mut Self, v: Option<i32>| m.ping_group_id = v)
            .field("name", |m: &mut Self, v: String| m.name = v)
            .field("ping_cooldown", |m: &mut Self, v: Option<i32>| m.ping_cooldown = v)
            .field("ping_reminder", |m: &mut Self, v: Option<i32>| m.ping_reminder = v)
            .field("max_pre_ping", |m: &mut Self, v: Option<i32>| m.max_pre_ping = v)
    }

    fn generate(g: &mut Generator) -> Result<Self, TestError> {
        Ok(Self {
            id: g.value(),
            guild_id: g.value::<u64>().to_string(),
            ping_format_id: g.value(),
            ping_group_id: g.value(),
            name: g.value(),
            ping_cooldown: g.value(),
            ping_reminder: g.value(),
            max_pre_ping: g.value(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::FakeRepositoryBuilder, record::Overrides};
    use fakerepo::Repository;

    #[test]
    fn optional_settings_are_populated() -> Result<(), TestError> {
        let repo = FakeRepositoryBuilder::<fleet_category::Model>::new()?;

        for category in repo.records() {
            assert!(category.ping_cooldown.is_some());
            assert!(category.ping_reminder.is_some());
            assert!(category.max_pre_ping.is_some());
        }

        Ok(())
    }

    #[test]
    fn overrides_optional_settings_with_none() -> Result<(), TestError> {
        let mut repo = FakeRepositoryBuilder::<fleet_category::Model>::with_options(false, 0)?;

        repo.add(
            Overrides::new()
                .with("name", "Strategic Ops".to_string())
                .with("ping_cooldown", None::<i32>)
                .with("ping_group_id", Some(4)),
        )?;

        let categories = repo.audit()?.get();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Strategic Ops");
        assert_eq!(categories[0].ping_cooldown, None);
        assert_eq!(categories[0].ping_group_id, Some(4));

        Ok(())
    }

    #[test]
    fn rejects_bare_value_for_optional_setting() -> Result<(), TestError> {
        let mut repo = FakeRepositoryBuilder::<fleet_category::Model>::with_options(false, 0)?;

        let result = repo.add_with("ping_cooldown", 60).map(|_| ());

        assert!(matches!(result, Err(TestError::TypeMismatch { .. })));
        assert!(repo.is_empty());

        Ok(())
    }
}
