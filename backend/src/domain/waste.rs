//! Value types shared by reports and collection tasks.

use std::fmt;
use std::sync::OnceLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum length for a free-text location.
pub const LOCATION_MAX: usize = 255;
/// Maximum length for a waste type label.
pub const WASTE_TYPE_MAX: usize = 64;
/// Maximum length for a free-text amount such as "5 kg".
pub const WASTE_AMOUNT_MAX: usize = 64;
/// Largest decoded image accepted for classification.
pub const IMAGE_MAX_BYTES: usize = 8 * 1024 * 1024;
/// Image formats the vision model accepts.
pub const SUPPORTED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// Validation errors for waste value types.
#[derive(Debug, Clone, PartialEq)]
pub enum WasteValidationError {
    Empty { field: &'static str },
    TooLong { field: &'static str, max: usize },
    UnsupportedImageType { mime_type: String },
    InvalidImageEncoding,
    EmptyImage,
    ImageTooLarge { max: usize },
    ConfidenceOutOfRange { value: f64 },
}

impl fmt::Display for WasteValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max } => write!(f, "{field} must be at most {max} characters"),
            Self::UnsupportedImageType { mime_type } => {
                write!(f, "unsupported image type: {mime_type}")
            }
            Self::InvalidImageEncoding => write!(f, "image must be base64 encoded"),
            Self::EmptyImage => write!(f, "image must not be empty"),
            Self::ImageTooLarge { max } => write!(f, "image must be at most {max} bytes"),
            Self::ConfidenceOutOfRange { value } => {
                write!(f, "confidence must be within [0, 1], got {value}")
            }
        }
    }
}

impl std::error::Error for WasteValidationError {}

fn bounded_text(
    raw: impl Into<String>,
    field: &'static str,
    max: usize,
) -> Result<String, WasteValidationError> {
    let raw = raw.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WasteValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(WasteValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

macro_rules! bounded_text_type {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Trim and validate the value.
            pub fn new(raw: impl Into<String>) -> Result<Self, WasteValidationError> {
                bounded_text(raw, $field, $max).map(Self)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = WasteValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

bounded_text_type!(
    /// Free-text location, typically a geocoded place name or "lat, lng".
    Location,
    "location",
    LOCATION_MAX
);
bounded_text_type!(
    /// Waste category such as "plastic" or "mixed household".
    WasteType,
    "wasteType",
    WASTE_TYPE_MAX
);
bounded_text_type!(
    /// Estimated quantity in free text, e.g. "5 kg".
    WasteAmount,
    "amount",
    WASTE_AMOUNT_MAX
);

static LEADING_QUANTITY_RE: OnceLock<Option<Regex>> = OnceLock::new();

impl WasteAmount {
    /// First decimal number in the text, or `0.0` when there is none.
    ///
    /// Units are ignored: "5 kg" and "5 bags" both count as `5.0`.
    ///
    /// # Examples
    /// ```
    /// use cleanbee::domain::WasteAmount;
    ///
    /// let amount = WasteAmount::new("about 2.5 liters").expect("valid amount");
    /// assert_eq!(amount.leading_quantity(), 2.5);
    /// ```
    pub fn leading_quantity(&self) -> f64 {
        LEADING_QUANTITY_RE
            .get_or_init(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").ok())
            .as_ref()
            .and_then(|re| re.find(&self.0))
            .and_then(|found| found.as_str().parse().ok())
            .unwrap_or(0.0)
    }
}

/// Model confidence score within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Validate a confidence score.
    pub fn new(value: f64) -> Result<Self, WasteValidationError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(WasteValidationError::ConfidenceOutOfRange { value })
        }
    }

    /// Raw score.
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = WasteValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Photo submitted for classification, kept base64 encoded for transport.
///
/// # Examples
/// ```
/// use cleanbee::domain::WasteImage;
///
/// let image = WasteImage::new("image/png", "data:image/png;base64,AAEC").expect("valid image");
/// assert_eq!(image.base64_data(), "AAEC");
/// assert_eq!(image.mime_type(), "image/png");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct WasteImage {
    mime_type: String,
    data: String,
}

impl WasteImage {
    /// Validate the MIME type and payload.
    ///
    /// A `data:<mime>;base64,` prefix is stripped when present; the declared
    /// MIME type is compared case-insensitively against the supported list.
    pub fn new(
        mime_type: impl AsRef<str>,
        data: impl AsRef<str>,
    ) -> Result<Self, WasteValidationError> {
        let mime_type = mime_type.as_ref().trim().to_ascii_lowercase();
        if !SUPPORTED_IMAGE_TYPES.contains(&mime_type.as_str()) {
            return Err(WasteValidationError::UnsupportedImageType { mime_type });
        }

        let data = strip_data_url_prefix(data.as_ref().trim());
        if data.is_empty() {
            return Err(WasteValidationError::EmptyImage);
        }
        let decoded = STANDARD
            .decode(data)
            .map_err(|_| WasteValidationError::InvalidImageEncoding)?;
        if decoded.is_empty() {
            return Err(WasteValidationError::EmptyImage);
        }
        if decoded.len() > IMAGE_MAX_BYTES {
            return Err(WasteValidationError::ImageTooLarge {
                max: IMAGE_MAX_BYTES,
            });
        }

        Ok(Self {
            mime_type,
            data: data.to_owned(),
        })
    }

    /// Normalised MIME type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload without any data-URL prefix.
    pub fn base64_data(&self) -> &str {
        &self.data
    }

    /// `data:` URL form of the image.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

impl fmt::Debug for WasteImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WasteImage")
            .field("mime_type", &self.mime_type)
            .field("base64_len", &self.data.len())
            .finish()
    }
}

fn strip_data_url_prefix(raw: &str) -> &str {
    match raw.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => raw,
    }
}
