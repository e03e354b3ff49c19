//! Static text assets and the dialogue cache.
//!
//! Every loader here recovers from missing or malformed input with a
//! built-in value; none of them can stop a session from starting.

pub mod dialogue;
pub mod generate;
pub mod logo;
pub mod personality;

pub use dialogue::{read_cache, read_records, select_record, write_cache, DialogueRecord, Round};
pub use logo::{version_line, LogoTemplate, LOADING_TEXT};
pub use personality::load_personality;
