pub mod extract;
pub mod parser;
pub mod types;

pub use extract::{PACK_WORDS, SKIP_KEYWORDS};
pub use parser::ReceiptParser;
pub use types::{CountMatch, ExtractedQuantity, LineOutcome, ParseError, ParseResult, SkipReason};
