use google_drive3::api::File;
use serde::{Deserialize, Serialize};

pub const NATIVE_SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
pub const UPLOADED_WORKBOOK_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A spreadsheet-like file as seen at listing time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileDescriptor {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    NativeSpreadsheet,
    UploadedWorkbook,
    Other,
}

impl FileKind {
    pub fn from_mime_type(mime_type: &str) -> Self {
        match mime_type {
            NATIVE_SPREADSHEET_MIME => FileKind::NativeSpreadsheet,
            UPLOADED_WORKBOOK_MIME => FileKind::UploadedWorkbook,
            _ => FileKind::Other,
        }
    }
}

impl FileDescriptor {
    pub fn kind(&self) -> FileKind {
        FileKind::from_mime_type(&self.mime_type)
    }
}

impl From<File> for FileDescriptor {
    fn from(file: File) -> Self {
        FileDescriptor {
            id: file.id.unwrap_or_default(),
            name: file.name.unwrap_or_default(),
            mime_type: file.mime_type.unwrap_or_default(),
        }
    }
}
