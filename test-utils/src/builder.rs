use std::{cell::RefCell, rc::Rc};

use fakerepo::{AnalyticsRepository, AuditRepository, DbContext, PrimaryRepository};

use crate::{
    config::FakeConfig,
    context::{Accessor, ContextCache},
    error::TestError,
    generator::Generator,
    record::{type_label, FieldTable, Overrides, Record},
};

/// Builder for fake repositories seeded with generated records.
///
/// Starts out with a number of fully random records. Tests add records with specific property
/// values, clear or reseed the list, then finalize the builder into the repository for the
/// database context the code under test reads from.
///
/// Finalized repositories read the builder's record list on every query, so records added or
/// cleared after finalizing are visible through every repository already handed out.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::FakeRepositoryBuilder;
/// use entity::user;
///
/// let mut repo = FakeRepositoryBuilder::<user::Model>::with_options(false, 0)?;
/// repo.add_with("name", "Alice")?
///     .add_with("admin", true)?;
///
/// let users = repo.primary()?;
/// assert_eq!(users.get().len(), 2);
/// ```
pub struct FakeRepositoryBuilder<M: Record> {
    /// Random source shared by construction, additions and refills.
    generator: Generator,

    /// Overridable properties of `M`, validated once on construction.
    fields: FieldTable<M>,

    /// Record list shared with every finalized repository.
    records: Rc<RefCell<Vec<M>>>,

    /// Repositories finalized so far, one per context.
    contexts: ContextCache<M>,
}

impl<M: Record> FakeRepositoryBuilder<M> {
    /// Creates a builder holding three random records.
    ///
    /// Circular references between record types fail generation.
    ///
    /// # Returns
    /// - `Ok(FakeRepositoryBuilder)` - Builder with default configuration applied
    /// - `Err(TestError)` - Property table is invalid or record generation failed
    pub fn new() -> Result<Self, TestError> {
        Self::from_config(FakeConfig::default())
    }

    /// Creates a builder with an explicit circular reference policy and record count.
    ///
    /// # Arguments
    /// - `ignore_circular_references` - Omit back-references instead of failing
    /// - `initial_count` - Number of random records to start with
    ///
    /// # Returns
    /// - `Ok(FakeRepositoryBuilder)` - Builder holding `initial_count` records
    /// - `Err(TestError)` - Property table is invalid or record generation failed
    pub fn with_options(
        ignore_circular_references: bool,
        initial_count: usize,
    ) -> Result<Self, TestError> {
        Self::from_config(
            FakeConfig::new()
                .ignore_circular_references(ignore_circular_references)
                .initial_count(initial_count),
        )
    }

    /// Creates a builder configured from `FAKE_REPO_SEED` and `FAKE_REPO_COUNT`.
    ///
    /// # Returns
    /// - `Ok(FakeRepositoryBuilder)` - Builder with environment overrides applied
    /// - `Err(TestError::Config)` - An environment variable holds an unparsable value
    pub fn from_env() -> Result<Self, TestError> {
        Self::from_config(FakeConfig::from_env()?)
    }

    /// Creates a builder from a full configuration.
    ///
    /// # Arguments
    /// - `config` - Circular reference policy, initial record count and optional seed
    ///
    /// # Returns
    /// - `Ok(FakeRepositoryBuilder)` - Builder holding `config.initial_count` records
    /// - `Err(TestError::DuplicateProperty)` - `M` registers a property twice
    /// - `Err(TestError::CircularReference)` - `M` refers back to itself and circular
    ///   references are not ignored
    pub fn from_config(config: FakeConfig) -> Result<Self, TestError> {
        let fields = M::fields();
        fields.validate()?;

        let mut generator = Generator::from_config(&config);
        let records = generator.create_many::<M>(config.initial_count)?;

        tracing::debug!(
            record = type_label::<M>(),
            count = records.len(),
            ignore_circular_references = config.ignore_circular_references,
            seed = ?config.seed,
            "Created fake repository"
        );

        Ok(Self {
            generator,
            fields,
            records: Rc::new(RefCell::new(records)),
            contexts: ContextCache::new(),
        })
    }

    /// Adds a record with specific property values.
    ///
    /// Every property not named in `overrides` gets a random value. The overrides are checked
    /// against the record's property table before the record is generated; on failure the
    /// record list is unchanged.
    ///
    /// # Arguments
    /// - `overrides` - Property names and the values to force onto them
    ///
    /// # Returns
    /// - `Ok(&mut Self)` - Builder for method chaining
    /// - `Err(TestError::PropertyNotFound)` - A property does not exist on `M`
    /// - `Err(TestError::TypeMismatch)` - A value's type differs from the property's type
    pub fn add(&mut self, overrides: Overrides) -> Result<&mut Self, TestError> {
        self.fields.check(&overrides)?;

        let mut record = self.generator.record::<M>()?;
        let overridden = overrides.len();
        self.fields.apply(&mut record, overrides)?;

        self.records.borrow_mut().push(record);

        tracing::debug!(
            record = type_label::<M>(),
            overridden,
            count = self.len(),
            "Added record to fake repository"
        );

        Ok(self)
    }

    /// Adds a record with a single property value.
    ///
    /// Shorthand for `add(Overrides::new().with(property, value))`.
    pub fn add_with<V: 'static>(
        &mut self,
        property: &str,
        value: V,
    ) -> Result<&mut Self, TestError> {
        self.add(Overrides::new().with(property, value))
    }

    /// Removes every record.
    pub fn clear(&mut self) -> &mut Self {
        self.records.borrow_mut().clear();

        tracing::debug!(record = type_label::<M>(), "Cleared fake repository");

        self
    }

    /// Removes every record, then generates `count` new random records.
    ///
    /// # Returns
    /// - `Ok(&mut Self)` - Builder for method chaining
    /// - `Err(TestError::CircularReference)` - Record generation failed; the list is left empty
    pub fn clear_and_refill(&mut self, count: usize) -> Result<&mut Self, TestError> {
        self.clear();

        if count != 0 {
            let fresh = self.generator.create_many::<M>(count)?;
            self.records.borrow_mut().extend(fresh);

            tracing::debug!(record = type_label::<M>(), count, "Refilled fake repository");
        }

        Ok(self)
    }

    /// Finalizes the builder for a database context.
    ///
    /// The first call for a context creates the context's mock repository; later calls return
    /// the same instance. Contexts are independent: finalizing one does not affect the others,
    /// and all of them serve the same record list.
    pub fn finalize(&mut self, context: DbContext) -> Accessor<M> {
        self.contexts.get_or_create(context, &self.records)
    }

    /// Finalizes the builder for a context given by numeric id.
    ///
    /// # Returns
    /// - `Ok(Accessor<M>)` - Accessor for the context
    /// - `Err(TestError::InvalidContext)` - `id` is not a known context id
    pub fn finalize_id(&mut self, id: i64) -> Result<Accessor<M>, TestError> {
        let context = DbContext::try_from(id)?;
        Ok(self.finalize(context))
    }

    /// Finalizes the builder and returns the primary context repository.
    ///
    /// # Returns
    /// - `Ok(Rc<dyn PrimaryRepository<M>>)` - Mock repository for the primary context
    /// - `Err(TestError::AccessorMismatch)` - Cached accessor belongs to another context
    pub fn primary(&mut self) -> Result<Rc<dyn PrimaryRepository<M>>, TestError> {
        self.finalize(DbContext::Primary).into_primary()
    }

    /// Finalizes the builder and returns the audit context repository.
    ///
    /// # Returns
    /// - `Ok(Rc<dyn AuditRepository<M>>)` - Mock repository for the audit context
    /// - `Err(TestError::AccessorMismatch)` - Cached accessor belongs to another context
    pub fn audit(&mut self) -> Result<Rc<dyn AuditRepository<M>>, TestError> {
        self.finalize(DbContext::Audit).into_audit()
    }

    /// Finalizes the builder and returns the analytics context repository.
    ///
    /// # Returns
    /// - `Ok(Rc<dyn AnalyticsRepository<M>>)` - Mock repository for the analytics context
    /// - `Err(TestError::AccessorMismatch)` - Cached accessor belongs to another context
    pub fn analytics(&mut self) -> Result<Rc<dyn AnalyticsRepository<M>>, TestError> {
        self.finalize(DbContext::Analytics).into_analytics()
    }

    /// Whether a repository was already finalized for `context`.
    ///
    /// # Returns
    /// - `true` - `context` was finalized and later calls reuse its repository
    /// - `false` - The next finalize call for `context` creates its repository
    pub fn is_finalized(&self, context: DbContext) -> bool {
        self.contexts.is_finalized(context)
    }

    /// Copy of the current record list.
    ///
    /// # Returns
    /// - `Vec<M>` - Records in insertion order, as a finalized repository would return them
    pub fn records(&self) -> Vec<M> {
        self.records.borrow().clone()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether the record list is empty.
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}
