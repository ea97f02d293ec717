pub mod prelude;

pub mod events;
pub mod pdf_files;
