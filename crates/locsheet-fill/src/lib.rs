//! locsheet_fill - Smart fill for drag-to-extend selections.
//!
//! Given the values a user selected, produce the values that continue them:
//! either a cyclic copy of the selection or, when every value shares the same
//! text around a trailing number, the next steps of that arithmetic sequence.

pub mod fill;
pub mod progression;

pub use fill::{FillAxis, FillMode, ParseFillModeError, generate_fill_data};
pub use progression::{Progression, detect_progression};
