pub mod enrich;
pub mod error;
pub mod link;
pub mod pipeline;
pub mod profile;
pub mod resolve;
pub mod scan;
pub mod story;
pub mod tags;
pub mod vitals;

pub use error::{Error, Result};
pub use link::{AhnentafelPairing, NoSpousePairing, SpousePolicy};
pub use pipeline::{Pipeline, PipelineOutput, PipelineStats};
pub use profile::{
    LifeEvent, LifeEventKind, Metadata, NamingEcho, PlaceParts, Profile, ProfileKind,
    RelatedLink, RelationKind, Relations, Story, VitalStats, Voyage,
};
pub use resolve::{MentionResolver, NameIndex};
pub use scan::{DocumentScanner, ScanPatterns};
