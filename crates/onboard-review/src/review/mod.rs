//! Client onboarding review: record model, fetching with canned fallbacks,
//! the archive behind `next-client`, and the identity/risk/consistency report.
//! Records are assembled from per-document feature files, and the game client
//! plays decisions against the onboarding game server.

pub mod archive;
pub mod assembly;
pub mod attributes;
pub mod export;
pub mod fallback;
pub mod fetcher;
pub mod game;
pub mod judge;
pub mod profile;
pub mod record;
pub mod report;
pub mod router;

pub use archive::{ArchiveError, ArchivedClient, ClientSource, DirectoryArchive};
pub use assembly::{
    assemble_archive, assemble_client, AssembledClient, AssemblyError, Feature, FeatureFile,
};
pub use attributes::{Attribute, SourceField};
pub use export::{review_archive, write_summary_csv, ReviewedClient};
pub use fallback::FallbackRotation;
pub use fetcher::{ClientFetcher, FetchError, FetchedClient, RecordOrigin};
pub use game::{
    judge_extracted_client, save_documents, DecisionOutcome, DocumentKind, GameClient,
    GameDocument, GameError, GameSession, GameStart,
};
pub use judge::Decision;
pub use profile::{display, ClientProfile, FinancialDetails, NOT_AVAILABLE};
pub use record::{ClientRecord, FieldValue};
pub use report::views::{
    IdentityCheck, IdentityCheckKind, ReviewReport, ReviewStatus, RiskLevel, StatusIndicator,
};
pub use report::{current_display_label, derive_report, display_label};
pub use router::review_router;
