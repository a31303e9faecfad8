//! Promotional calendar domain: plan, library, history, and view slicing.

pub mod history;
pub mod library;
pub mod plan;
pub mod types;
pub mod view;

pub use history::{History, SavedSession};
pub use library::{Library, LibraryCandidate, Rejected};
pub use plan::Plan;
pub use types::{
    CellEdit, ChainConfig, ChainPromotionRow, LibraryPromotion, Month, PromoEntry, PromotionStatus,
};
pub use view::ViewRange;
