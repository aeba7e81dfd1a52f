//! File classification by extension.
//!
//! Categories are coarse buckets (images, videos, documents, ...) used to
//! group report output; they play no role in duplicate detection itself.

use serde::Serialize;
use std::fmt;

/// Coarse file category derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Images,
    Videos,
    Audio,
    Documents,
    Archives,
    Executables,
    Scripts,
    Data,
    System,
    Fonts,
    Design,
    Other,
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Images => "images",
            Self::Videos => "videos",
            Self::Audio => "audio",
            Self::Documents => "documents",
            Self::Archives => "archives",
            Self::Executables => "executables",
            Self::Scripts => "scripts",
            Self::Data => "data",
            Self::System => "system",
            Self::Fonts => "fonts",
            Self::Design => "design",
            Self::Other => "other",
        };
        write!(f, "{}", name)
    }
}

impl FileCategory {
    /// Classify a lowercase extension (without the leading dot).
    ///
    /// Unknown or missing extensions map to [`FileCategory::Other`].
    ///
    /// # Example
    ///
    /// ```
    /// use dupescan::scanner::FileCategory;
    ///
    /// assert_eq!(FileCategory::from_extension("jpg"), FileCategory::Images);
    /// assert_eq!(FileCategory::from_extension("xyz"), FileCategory::Other);
    /// ```
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tiff" | "webp" | "raw" | "heic" | "svg"
            | "ico" | "jpe" | "tif" => Self::Images,
            "mp4" | "avi" | "mov" | "wmv" | "flv" | "mkv" | "webm" | "m4v" | "mpg" | "mpeg"
            | "3gp" | "3gpp" | "m2ts" | "mts" | "ts" | "vob" => Self::Videos,
            "mp3" | "wav" | "flac" | "aac" | "ogg" | "wma" | "m4a" | "amr" | "mka" | "opus" => {
                Self::Audio
            }
            "pdf" | "doc" | "docx" | "txt" | "rtf" | "xls" | "xlsx" | "ppt" | "pptx" | "odt"
            | "ods" | "odp" | "md" | "tex" => Self::Documents,
            "zip" | "rar" | "7z" | "tar" | "gz" | "bz2" | "xz" | "tgz" | "tbz2" => Self::Archives,
            "exe" | "msi" | "bat" | "cmd" | "bin" | "app" | "apk" | "deb" | "rpm" => {
                Self::Executables
            }
            "py" | "js" | "java" | "c" | "cpp" | "html" | "css" | "php" | "rb" | "pl" | "sh"
            | "bash" | "ps1" | "vbs" => Self::Scripts,
            "db" | "csv" | "json" | "xml" | "sql" | "sqlite" | "sqlite3" | "mdb" | "accdb"
            | "ini" | "cfg" => Self::Data,
            "dll" | "sys" | "inf" | "cat" | "drv" | "ocx" | "cpl" => Self::System,
            "ttf" | "otf" | "woff" | "woff2" | "eot" | "fon" => Self::Fonts,
            "psd" | "ai" | "sketch" | "fig" | "xd" | "indd" => Self::Design,
            _ => Self::Other,
        }
    }

    /// Classify a path by its extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &std::path::Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(Self::Other, |e| Self::from_extension(&e.to_lowercase()))
    }
}
