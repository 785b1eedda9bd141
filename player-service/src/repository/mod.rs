//! Storage collaborator for players
//!
//! - [`PlayerRepository`]: async storage trait (RPITIT, no `async_trait`)
//! - [`Specification`]: conjunction of [`Predicate`]s built from [`FilterCondition`]s
//! - [`Pagination`]: offset/limit window
//! - [`InMemoryPlayerRepository`]: process-local store
//! - `PgPlayerRepository`: PostgreSQL store (feature `database`)

mod error;
mod filter;
mod memory;
mod pagination;
#[cfg(feature = "database")]
mod postgres;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use filter::{FilterCondition, FilterOperator, FilterValue, Predicate, Specification};
pub use memory::InMemoryPlayerRepository;
pub use pagination::Pagination;
#[cfg(feature = "database")]
pub use postgres::PgPlayerRepository;
pub use traits::{PlayerRepository, RepositoryResult};
