mod client;
mod run;
mod scoring;

pub use self::client::{CommandVowelizer, VowelizedResponse, Vowelizer};
pub use self::run::run;
pub use self::scoring::{BlendedScorer, ExactScorer, ResponseScorer, TextScore, WordScorer};
