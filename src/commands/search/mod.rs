mod backend;
mod run;
mod scoring;
mod types;

pub use self::backend::{CorpusDocument, SqliteSearchIndex, ensure_index_schema, upsert_document};
pub use self::run::run;
pub use self::scoring::score_query_line;
pub use self::types::{ComponentWeights, QueryLine, RetrievedHit, ScoreBreakdown, SearchBackend};
