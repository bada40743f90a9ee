//! Pure logic with no hardware access

pub mod load_file;
mod reader_selection;

pub use reader_selection::select_single_reader;
