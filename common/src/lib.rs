//! Domain-neutral helpers shared by the workspace crates.

pub mod buffer2;
pub mod file_format;
pub mod log_setup;
pub mod parallel;
pub mod test_utils;

pub fn is_debug() -> bool {
    cfg!(debug_assertions)
}
