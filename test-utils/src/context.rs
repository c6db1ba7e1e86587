use std::{
    cell::RefCell,
    collections::{hash_map::Entry, HashMap},
    rc::Rc,
};

use fakerepo::{
    repository::{MockAnalyticsRepo, MockAuditRepo, MockPrimaryRepo},
    AnalyticsRepository, AuditRepository, DbContext, PrimaryRepository, Repository,
};

use crate::{error::TestError, record::type_label};

/// Finalized repository for one database context.
///
/// Wraps the mock created for the context as the trait object code under test consumes.
pub enum Accessor<M: 'static> {
    Primary(Rc<dyn PrimaryRepository<M>>),
    Audit(Rc<dyn AuditRepository<M>>),
    Analytics(Rc<dyn AnalyticsRepository<M>>),
}

impl<M: 'static> Clone for Accessor<M> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Primary(repo) => Accessor::Primary(Rc::clone(repo)),
            Accessor::Audit(repo) => Accessor::Audit(Rc::clone(repo)),
            Accessor::Analytics(repo) => Accessor::Analytics(Rc::clone(repo)),
        }
    }
}

impl<M: 'static> Accessor<M> {
    /// Context this accessor was finalized for.
    pub fn context(&self) -> DbContext {
        match self {
            Accessor::Primary(_) => DbContext::Primary,
            Accessor::Audit(_) => DbContext::Audit,
            Accessor::Analytics(_) => DbContext::Analytics,
        }
    }

    /// Runs the repository's query operation.
    pub fn get(&self) -> Vec<M> {
        match self {
            Accessor::Primary(repo) => repo.get(),
            Accessor::Audit(repo) => repo.get(),
            Accessor::Analytics(repo) => repo.get(),
        }
    }

    /// Whether both accessors wrap the same mock instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Accessor::Primary(a), Accessor::Primary(b)) => Rc::ptr_eq(a, b),
            (Accessor::Audit(a), Accessor::Audit(b)) => Rc::ptr_eq(a, b),
            (Accessor::Analytics(a), Accessor::Analytics(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Unwraps the primary context repository.
    ///
    /// # Returns
    /// - `Ok(Rc<dyn PrimaryRepository<M>>)` - Repository wrapped by this accessor
    /// - `Err(TestError::AccessorMismatch)` - Accessor belongs to another context
    pub fn into_primary(self) -> Result<Rc<dyn PrimaryRepository<M>>, TestError> {
        match self {
            Accessor::Primary(repo) => Ok(repo),
            other => Err(other.mismatch(DbContext::Primary)),
        }
    }

    /// Unwraps the audit context repository.
    ///
    /// # Returns
    /// - `Ok(Rc<dyn AuditRepository<M>>)` - Repository wrapped by this accessor
    /// - `Err(TestError::AccessorMismatch)` - Accessor belongs to another context
    pub fn into_audit(self) -> Result<Rc<dyn AuditRepository<M>>, TestError> {
        match self {
            Accessor::Audit(repo) => Ok(repo),
            other => Err(other.mismatch(DbContext::Audit)),
        }
    }

    /// Unwraps the analytics context repository.
    ///
    /// # Returns
    /// - `Ok(Rc<dyn AnalyticsRepository<M>>)` - Repository wrapped by this accessor
    /// - `Err(TestError::AccessorMismatch)` - Accessor belongs to another context
    pub fn into_analytics(self) -> Result<Rc<dyn AnalyticsRepository<M>>, TestError> {
        match self {
            Accessor::Analytics(repo) => Ok(repo),
            other => Err(other.mismatch(DbContext::Analytics)),
        }
    }

    fn mismatch(&self, expected: DbContext) -> TestError {
        TestError::AccessorMismatch {
            expected,
            found: self.context(),
        }
    }
}

/// Mocks created so far, one per database context.
///
/// A context moves from unfinalized to finalized the first time its accessor is requested and
/// stays finalized for the lifetime of the cache. Every finalized mock reads the same shared
/// record list on each query, so later changes to the list are visible through all of them.
pub struct ContextCache<M: 'static> {
    accessors: HashMap<DbContext, Accessor<M>>,
}

impl<M: Clone + 'static> Default for ContextCache<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Clone + 'static> ContextCache<M> {
    /// Creates a cache with no finalized contexts.
    pub fn new() -> Self {
        Self {
            accessors: HashMap::new(),
        }
    }

    /// Whether an accessor was already created for `context`.
    pub fn is_finalized(&self, context: DbContext) -> bool {
        self.accessors.contains_key(&context)
    }

    /// Contexts finalized so far, ordered by id.
    pub fn finalized(&self) -> Vec<DbContext> {
        let mut contexts: Vec<DbContext> = self.accessors.keys().copied().collect();
        contexts.sort();
        contexts
    }

    /// Gets or creates the accessor for a context.
    ///
    /// Returns the cached accessor if the context was already finalized, otherwise creates a
    /// mock for the context whose query operation returns the current contents of `records`,
    /// caches it and returns it.
    ///
    /// # Arguments
    /// - `context` - Database context to finalize
    /// - `records` - Record list shared with the owning repository builder
    ///
    /// # Returns
    /// - `Accessor<M>` - Accessor wrapping the context's mock
    pub fn get_or_create(
        &mut self,
        context: DbContext,
        records: &Rc<RefCell<Vec<M>>>,
    ) -> Accessor<M> {
        match self.accessors.entry(context) {
            Entry::Occupied(entry) => {
                tracing::trace!(%context, record = type_label::<M>(), "Reusing finalized context");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let accessor = create_accessor(context, records);
                tracing::debug!(
                    %context,
                    record = type_label::<M>(),
                    records = records.borrow().len(),
                    "Finalized fake repository"
                );
                entry.insert(accessor).clone()
            }
        }
    }
}

fn create_accessor<M: Clone + 'static>(
    context: DbContext,
    records: &Rc<RefCell<Vec<M>>>,
) -> Accessor<M> {
    match context {
        DbContext::Primary => {
            let mut mock = MockPrimaryRepo::new();
            mock.expect_get().returning_st(live_view(records));
            Accessor::Primary(Rc::new(mock))
        }
        DbContext::Audit => {
            let mut mock = MockAuditRepo::new();
            mock.expect_get().returning_st(live_view(records));
            Accessor::Audit(Rc::new(mock))
        }
        DbContext::Analytics => {
            let mut mock = MockAnalyticsRepo::new();
            mock.expect_get().returning_st(live_view(records));
            Accessor::Analytics(Rc::new(mock))
        }
    }
}

/// Query body reading the shared record list at call time.
fn live_view<M: Clone + 'static>(
    records: &Rc<RefCell<Vec<M>>>,
) -> impl FnMut() -> Vec<M> + 'static {
    let records = Rc::clone(records);
    move || records.borrow().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(values: &[u32]) -> Rc<RefCell<Vec<u32>>> {
        Rc::new(RefCell::new(values.to_vec()))
    }

    #[test]
    fn creates_accessor_for_requested_context() {
        let records = shared(&[1, 2]);
        let mut cache = ContextCache::new();

        for context in DbContext::ALL {
            let accessor = cache.get_or_create(context, &records);
            assert_eq!(accessor.context(), context);
            assert_eq!(accessor.get(), vec![1, 2]);
        }

        assert_eq!(cache.finalized(), DbContext::ALL.to_vec());
    }

    #[test]
    fn reuses_cached_accessor() {
        let records = shared(&[]);
        let mut cache = ContextCache::new();

        let first = cache.get_or_create(DbContext::Audit, &records);
        let second = cache.get_or_create(DbContext::Audit, &records);
        let other = cache.get_or_create(DbContext::Primary, &records);

        assert!(first.ptr_eq(&second));
        assert!(!first.ptr_eq(&other));
    }

    #[test]
    fn tracks_finalized_contexts() {
        let records = shared(&[]);
        let mut cache = ContextCache::new();

        assert!(!cache.is_finalized(DbContext::Analytics));

        cache.get_or_create(DbContext::Analytics, &records);

        assert!(cache.is_finalized(DbContext::Analytics));
        assert!(!cache.is_finalized(DbContext::Primary));
    }

    #[test]
    fn accessor_reads_list_at_query_time() {
        let records = shared(&[7]);
        let mut cache = ContextCache::new();
        let accessor = cache.get_or_create(DbContext::Primary, &records);

        records.borrow_mut().push(8);

        assert_eq!(accessor.get(), vec![7, 8]);
    }

    #[test]
    fn converts_into_typed_repository() -> Result<(), TestError> {
        let records = shared(&[3]);
        let mut cache = ContextCache::new();
        let accessor = cache.get_or_create(DbContext::Audit, &records);

        let repo = accessor.into_audit()?;
        assert_eq!(repo.get(), vec![3]);

        Ok(())
    }

    #[test]
    fn rejects_conversion_into_other_context() {
        let records = shared(&[3]);
        let mut cache = ContextCache::new();
        let accessor = cache.get_or_create(DbContext::Audit, &records);

        let result = accessor.into_primary().map(|_| ());

        assert_eq!(
            result,
            Err(TestError::AccessorMismatch {
                expected: DbContext::Primary,
                found: DbContext::Audit,
            })
        );
    }
}
