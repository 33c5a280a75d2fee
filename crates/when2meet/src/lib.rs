//! # when2meet
//!
//! Source collaborators for `overlap-engine`: turns a When2Meet link (or a
//! saved copy of the page) into a [`SlotCatalog`](overlap_engine::SlotCatalog).
//!
//! A When2Meet page embeds its availability grid as JavaScript statements:
//!
//! ```text
//! PeopleNames[0] = 'Ana';PeopleIDs[0] = 101;
//! TimeOfSlot[0]=1741096800;
//! AvailableAtSlot[0].push(101);
//! ```
//!
//! ## Modules
//!
//! - [`link`] — Event-id parsing and URL/path classification
//! - [`fetch`] — Blocking HTTP retrieval behind the [`PageFetcher`] trait
//! - [`extract`] — Embedded script data → catalog, event name, roster
//! - [`loader`] — [`When2MeetLoader`], the engine's `SourceLoader`

pub mod extract;
pub mod fetch;
pub mod link;
pub mod loader;

pub use extract::{extract_event_name, extract_page, ExtractedPage};
pub use fetch::{HttpFetcher, PageFetcher};
pub use link::{event_id, is_remote};
pub use loader::When2MeetLoader;
