use std::fmt;
use std::str::FromStr;

/// Requested conversion target. Parsed case-insensitively from the token the
/// client sends; `jpeg` is accepted as an alias for `jpg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    Pdf,
    Png,
    Jpg,
    Docx,
}

impl TargetFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Pdf => "pdf",
            TargetFormat::Png => "png",
            TargetFormat::Jpg => "jpg",
            TargetFormat::Docx => "docx",
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            TargetFormat::Pdf => "application/pdf",
            TargetFormat::Png => "image/png",
            TargetFormat::Jpg => "image/jpeg",
            TargetFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl FromStr for TargetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "docx" => Ok(Self::Docx),
            other => Err(format!("Unsupported target format: {}", other)),
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}
