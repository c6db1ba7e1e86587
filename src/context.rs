use std::{fmt, str::FromStr};

use crate::error::ContextError;

/// Database contexts a repository can be bound to.
///
/// Each context has its own repository trait in [`crate::repository`]; all of them share the
/// [`Repository`](crate::repository::Repository) query contract.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DbContext {
    /// Main application database.
    Primary,
    /// Append-only audit database.
    Audit,
    /// Reporting replica.
    Analytics,
}

impl DbContext {
    /// Every context, ordered by id.
    pub const ALL: [DbContext; 3] = [DbContext::Primary, DbContext::Audit, DbContext::Analytics];

    /// Numeric id of the context.
    ///
    /// # Returns
    /// - `i64` - `0` for primary, `1` for audit, `2` for analytics
    pub fn id(self) -> i64 {
        match self {
            DbContext::Primary => 0,
            DbContext::Audit => 1,
            DbContext::Analytics => 2,
        }
    }

    /// Lowercase name of the context.
    pub fn name(self) -> &'static str {
        match self {
            DbContext::Primary => "primary",
            DbContext::Audit => "audit",
            DbContext::Analytics => "analytics",
        }
    }
}

impl TryFrom<i64> for DbContext {
    type Error = ContextError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        DbContext::ALL
            .into_iter()
            .find(|context| context.id() == id)
            .ok_or(ContextError::UnknownId(id))
    }
}

impl FromStr for DbContext {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DbContext::ALL
            .into_iter()
            .find(|context| context.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ContextError::UnknownName(s.to_string()))
    }
}

impl fmt::Display for DbContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_ids_both_ways() {
        for context in DbContext::ALL {
            assert_eq!(DbContext::try_from(context.id()), Ok(context));
        }
    }

    #[test]
    fn rejects_unknown_id() {
        assert_eq!(DbContext::try_from(3), Err(ContextError::UnknownId(3)));
        assert_eq!(DbContext::try_from(-1), Err(ContextError::UnknownId(-1)));
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Audit".parse::<DbContext>(), Ok(DbContext::Audit));
        assert_eq!(" analytics ".parse::<DbContext>(), Ok(DbContext::Analytics));
        assert_eq!(DbContext::Primary.to_string(), "primary");
    }

    #[test]
    fn rejects_unknown_name() {
        assert_eq!(
            "reporting".parse::<DbContext>(),
            Err(ContextError::UnknownName("reporting".to_string()))
        );
    }
}
