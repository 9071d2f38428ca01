//! Resolution of local names to remote numeric ids.
//!
//! Both resolvers hold run-scoped state. The publisher owns one of each for
//! the duration of a run and drops them afterwards.

mod parent;
mod taxonomy;

pub use parent::ParentResolver;
pub use taxonomy::TaxonomyIndex;
