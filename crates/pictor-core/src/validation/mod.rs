//! Validation modules

pub mod upload;

pub use upload::{
    validate_batch_selector, validate_content_type, validate_file_size, validate_filename,
    MAX_FILENAME_LENGTH,
};
