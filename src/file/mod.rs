//! Input selection, output naming and file discovery.

mod discovery;
mod info;
mod operations;

pub use discovery::{discover, is_eligible, is_excluded};
pub use info::FileInfo;
pub use operations::{commit_output, is_encrypted_file, output_path, read_input, stage_output, validate_input};
