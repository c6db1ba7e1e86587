//! Repository contracts per database context.
//!
//! Every context exposes the same query operation through [`Repository`]. The per-context
//! traits exist so services can state which database they read from, and so a test can hand a
//! service a repository for one context without it being accepted for another.

/// Query contract shared by every context repository.
pub trait Repository<M> {
    /// Returns all records currently visible through the repository.
    fn get(&self) -> Vec<M>;
}

/// Repository backed by the primary database.
pub trait PrimaryRepository<M>: Repository<M> {}

/// Repository backed by the audit database.
pub trait AuditRepository<M>: Repository<M> {}

/// Repository backed by the analytics replica.
pub trait AnalyticsRepository<M>: Repository<M> {}

#[cfg(any(feature = "mock", test))]
mockall::mock! {
    pub PrimaryRepo<M: 'static> {}
    impl<M: 'static> Repository<M> for PrimaryRepo<M> {
        fn get(&self) -> Vec<M>;
    }
    impl<M: 'static> PrimaryRepository<M> for PrimaryRepo<M> {}
}

#[cfg(any(feature = "mock", test))]
mockall::mock! {
    pub AuditRepo<M: 'static> {}
    impl<M: 'static> Repository<M> for AuditRepo<M> {
        fn get(&self) -> Vec<M>;
    }
    impl<M: 'static> AuditRepository<M> for AuditRepo<M> {}
}

#[cfg(any(feature = "mock", test))]
mockall::mock! {
    pub AnalyticsRepo<M: 'static> {}
    impl<M: 'static> Repository<M> for AnalyticsRepo<M> {
        fn get(&self) -> Vec<M>;
    }
    impl<M: 'static> AnalyticsRepository<M> for AnalyticsRepo<M> {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_admins(repo: &dyn PrimaryRepository<(String, bool)>) -> usize {
        repo.get().into_iter().filter(|(_, admin)| *admin).count()
    }

    #[test]
    fn mock_serves_configured_records() {
        let mut repo = MockPrimaryRepo::new();
        repo.expect_get().returning(|| {
            vec![
                ("alice".to_string(), true),
                ("bob".to_string(), false),
                ("carol".to_string(), true),
            ]
        });

        assert_eq!(count_admins(&repo), 2);
    }

    #[test]
    fn context_mocks_are_distinct_types() {
        let mut audit = MockAuditRepo::<u32>::new();
        audit.expect_get().return_const(vec![1u32, 2, 3]);
        let mut analytics = MockAnalyticsRepo::<u32>::new();
        analytics.expect_get().return_const(Vec::<u32>::new());

        let audit: &dyn AuditRepository<u32> = &audit;
        let analytics: &dyn AnalyticsRepository<u32> = &analytics;

        assert_eq!(audit.get(), vec![1, 2, 3]);
        assert!(analytics.get().is_empty());
    }
}
