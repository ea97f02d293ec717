pub use super::events::Entity as Events;
pub use super::pdf_files::Entity as PdfFiles;
