pub mod config;
pub mod extractor;
pub mod fixer;
pub mod logger;
pub mod repair;
pub mod session;
pub mod store;

pub use config::Settings;
pub use extractor::{extract_chapter_number, match_title};
pub use fixer::ChapterFixer;
pub use repair::{Anomaly, RepairReport, repair};
pub use session::{Chapter, Session};
pub use store::{MissingInput, SessionFile};
