//! Follow-up generation, issue lineage, and practice-gap linking for weekly
//! CAP (context / assessment / plan) mentoring notes.
//!
//! Everything here is a synchronous transformation over plain documents. The
//! note store, the people roster, and id generation are supplied by the
//! caller; nothing here performs I/O apart from [`EngineConfig::load`].

pub mod catalog;
pub mod config;
pub mod engine;
mod error;
pub mod factory;
pub mod follow_up;
pub mod formatter;
pub mod gap_link;
pub mod ids;
pub mod lineage;
pub mod model;
pub mod tag;

pub use config::{DuplicateLinkPolicy, EngineConfig};
pub use engine::{FinalizedIssue, NoteEngine, StartedNote};
pub use error::{CapnoteError, ConfigError, Result};
pub use factory::{FollowUpDraft, FollowUpFactory, merge_outcomes};
pub use follow_up::{FollowUp, Outcome, ParsedPractice, ReflectionAnswer, Reflections};
pub use formatter::{NameRoster, PracticeText, Roster};
pub use gap_link::{GapLink, GapLinkResult, PracticeGapLinker};
pub use ids::{IdSource, SequentialIds, UuidIds};
pub use lineage::IssueLookup;
pub use model::{
    BlockType, ContextKind, ContextRef, IssueObject, NoteHeader, PracticeGapObject, Section,
    TextEntryBlock, WeeklyNote,
};
pub use tag::{HelpTarget, Tag, TagKind, Venue, parse_tag};
