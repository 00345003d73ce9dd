//! OmniVault Common Library
//!
//! CLIと各フロントで共有される型と正規化ロジック

pub mod category;
pub mod duplicate;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod prompts;
pub mod types;

pub use category::{normalize_category, Category};
pub use duplicate::{annotate_duplicates, is_duplicate_of};
pub use error::{Error, Result};
pub use normalizer::{
    coerce_price, normalize_detection, normalize_detections, DEFAULT_LOCATION, DEFAULT_NAME,
};
pub use parser::{extract_json, parse_detection_response};
pub use prompts::{
    build_advice_prompt, build_chat_prompt, build_detect_prompt, summarize_inventory,
};
pub use types::{
    BoundingBox, ChatMessage, ChatRole, InventoryItem, PendingItem, RawDetection, RawPrice,
};
