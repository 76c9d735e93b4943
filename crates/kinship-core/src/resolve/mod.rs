//! Name indexing and mention resolution: discovering and disambiguating
//! references between people inside free-text notes, and the reciprocal
//! bookkeeping that keeps every discovered link two-directional.

pub mod echo;
pub mod index;
pub mod mentions;

pub use index::NameIndex;
pub use mentions::{
    populate_associates, MentionResolver, MentionStats, CONTEMPORARY_WINDOW,
    DISAMBIGUATION_WINDOW,
};
