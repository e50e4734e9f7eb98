//! The Anatel SMP station export: column table, normalized record and the
//! CSV normalizer.

pub mod columns;
pub mod normalize;
pub mod record;

pub use columns::{COLUMNS, ColumnKind, ColumnSpec, StationColumn, UnknownColumnError};
pub use normalize::{NormalizeError, Normalized, normalize, normalize_reader};
pub use record::{Cell, StationRecord};
