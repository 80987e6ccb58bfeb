pub mod file;
pub mod profile;
pub mod row;

pub use file::{FileDescriptor, FileKind};
pub use profile::UserProfile;
pub use row::{FromSheetRows, SheetRow};
