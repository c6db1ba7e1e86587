//! Random value and record generation.
//!
//! The generator fills every field of a record with a random value. Numbers are drawn from a
//! strictly increasing sequence so identifiers never collide within a repository, strings are
//! random alphanumerics, and collections get three elements.
//!
//! Record types that refer back to themselves (directly or through another record) are
//! detected while generating. Depending on the [`RecursionPolicy`] the back-reference is either
//! left out or reported as [`TestError::CircularReference`].

use std::any::TypeId;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rand::{distr::Alphanumeric, rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::FakeConfig,
    error::TestError,
    record::{type_label, Record},
};

/// Number of elements generated for collections.
pub const DEFAULT_COLLECTION_LEN: usize = 3;

/// Length of generated strings.
const STRING_LEN: usize = 12;

/// Range in days around today that generated dates fall into.
const DATE_SPREAD_DAYS: i64 = 365;

/// How the generator reacts when a record type refers back to a type under construction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RecursionPolicy {
    /// Fail with [`TestError::CircularReference`].
    #[default]
    Throw,
    /// Leave the back-reference empty (`None` or an empty collection).
    Omit,
}

impl RecursionPolicy {
    /// Policy matching the `ignore_circular_references` flag.
    pub fn from_ignore_flag(ignore_circular_references: bool) -> Self {
        if ignore_circular_references {
            RecursionPolicy::Omit
        } else {
            RecursionPolicy::Throw
        }
    }
}

/// Values the generator can produce without further configuration.
pub trait Generate: Sized {
    fn generate(g: &mut Generator) -> Self;
}

/// Source of random values and records.
pub struct Generator {
    rng: StdRng,
    policy: RecursionPolicy,
    sequence: u64,
    /// Record types currently being generated, outermost first.
    stack: Vec<(TypeId, &'static str)>,
}

impl Generator {
    /// Creates a generator seeded from the operating system.
    pub fn new(policy: RecursionPolicy) -> Self {
        Self::with_rng(policy, StdRng::from_os_rng())
    }

    /// Creates a generator that produces the same values for the same seed.
    pub fn seeded(policy: RecursionPolicy, seed: u64) -> Self {
        Self::with_rng(policy, StdRng::seed_from_u64(seed))
    }

    /// Creates a generator from repository configuration.
    pub fn from_config(config: &FakeConfig) -> Self {
        let policy = RecursionPolicy::from_ignore_flag(config.ignore_circular_references);
        match config.seed {
            Some(seed) => Self::seeded(policy, seed),
            None => Self::new(policy),
        }
    }

    fn with_rng(policy: RecursionPolicy, rng: StdRng) -> Self {
        Self {
            rng,
            policy,
            sequence: 0,
            stack: Vec::new(),
        }
    }

    /// Policy applied when a nested record refers back to a type under construction.
    pub fn policy(&self) -> RecursionPolicy {
        self.policy
    }

    /// Next value of the number sequence, starting at 1.
    pub fn next_number(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    /// Generates a single value.
    pub fn value<T: Generate>(&mut self) -> T {
        T::generate(self)
    }

    /// Generates a record with every field populated.
    ///
    /// Fails if `R` is already under construction, regardless of policy: a field that always
    /// holds a record cannot be left out. Use [`Generator::nested`] for optional references.
    ///
    /// # Returns
    /// - `Ok(R)` - Generated record
    /// - `Err(TestError::CircularReference)` - `R` refers back to itself
    pub fn record<R: Record>(&mut self) -> Result<R, TestError> {
        if self.is_generating::<R>() {
            return Err(self.circular_reference::<R>());
        }

        self.stack.push((TypeId::of::<R>(), type_label::<R>()));
        let record = R::generate(self);
        self.stack.pop();

        record
    }

    /// Generates a record for an optional reference.
    ///
    /// # Returns
    /// - `Ok(Some(R))` - Generated record
    /// - `Ok(None)` - `R` is already under construction and the policy is [`RecursionPolicy::Omit`]
    /// - `Err(TestError::CircularReference)` - `R` is already under construction and the policy
    ///   is [`RecursionPolicy::Throw`]
    pub fn nested<R: Record>(&mut self) -> Result<Option<R>, TestError> {
        if self.is_generating::<R>() {
            return match self.policy {
                RecursionPolicy::Omit => {
                    tracing::trace!(record = type_label::<R>(), "Omitting circular reference");
                    Ok(None)
                }
                RecursionPolicy::Throw => Err(self.circular_reference::<R>()),
            };
        }

        self.record().map(Some)
    }

    /// Generates `count` records for a collection reference.
    ///
    /// Returns an empty collection instead of a circular reference under
    /// [`RecursionPolicy::Omit`].
    pub fn nested_many<R: Record>(&mut self, count: usize) -> Result<Vec<R>, TestError> {
        if self.is_generating::<R>() {
            return match self.policy {
                RecursionPolicy::Omit => {
                    tracing::trace!(record = type_label::<R>(), "Omitting circular collection");
                    Ok(Vec::new())
                }
                RecursionPolicy::Throw => Err(self.circular_reference::<R>()),
            };
        }

        self.create_many(count)
    }

    /// Generates `count` independent records.
    pub fn create_many<R: Record>(&mut self, count: usize) -> Result<Vec<R>, TestError> {
        (0..count).map(|_| self.record()).collect()
    }

    fn is_generating<R: 'static>(&self) -> bool {
        let id = TypeId::of::<R>();
        self.stack.iter().any(|(ty, _)| *ty == id)
    }

    fn circular_reference<R: 'static>(&self) -> TestError {
        let mut path: Vec<&str> = self.stack.iter().map(|(_, name)| *name).collect();
        path.push(type_label::<R>());

        TestError::CircularReference {
            path: path.join(" -> "),
        }
    }
}

macro_rules! impl_generate_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Generate for $ty {
                fn generate(g: &mut Generator) -> Self {
                    // Wrap into 1..=MAX so small types stay positive and non-zero.
                    let max = <$ty>::MAX as u64;
                    ((g.next_number() - 1) % max + 1) as $ty
                }
            }
        )*
    };
}

impl_generate_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Generate for f32 {
    fn generate(g: &mut Generator) -> Self {
        g.next_number() as f32 + g.rng.random::<f32>()
    }
}

impl Generate for f64 {
    fn generate(g: &mut Generator) -> Self {
        g.next_number() as f64 + g.rng.random::<f64>()
    }
}

impl Generate for bool {
    fn generate(g: &mut Generator) -> Self {
        g.rng.random()
    }
}

impl Generate for char {
    fn generate(g: &mut Generator) -> Self {
        char::from(g.rng.sample(Alphanumeric))
    }
}

impl Generate for String {
    fn generate(g: &mut Generator) -> Self {
        (&mut g.rng)
            .sample_iter(Alphanumeric)
            .take(STRING_LEN)
            .map(char::from)
            .collect()
    }
}

impl<T: Generate> Generate for Option<T> {
    fn generate(g: &mut Generator) -> Self {
        Some(T::generate(g))
    }
}

impl<T: Generate> Generate for Vec<T> {
    fn generate(g: &mut Generator) -> Self {
        (0..DEFAULT_COLLECTION_LEN).map(|_| T::generate(g)).collect()
    }
}

impl<T: Generate> Generate for Box<T> {
    fn generate(g: &mut Generator) -> Self {
        Box::new(T::generate(g))
    }
}

impl Generate for DateTime<Utc> {
    fn generate(g: &mut Generator) -> Self {
        let seconds = g
            .rng
            .random_range(-DATE_SPREAD_DAYS * 86_400..=DATE_SPREAD_DAYS * 86_400);
        Utc::now() + TimeDelta::seconds(seconds)
    }
}

impl Generate for NaiveDate {
    fn generate(g: &mut Generator) -> Self {
        let days = g.rng.random_range(-DATE_SPREAD_DAYS..=DATE_SPREAD_DAYS);
        Utc::now().date_naive() + TimeDelta::days(days)
    }
}
