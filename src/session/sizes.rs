//! Image size codes accepted by the `thumbsize` and `imgmax` parameters.
//!
//! Sizes up to 160 px come cropped (`72c`) or uncropped (`72u`, or bare
//! `72`). Widths up to 800 px are embeddable and uncropped only. Larger
//! widths are not embeddable and take no suffix.

use std::fmt;
use std::str::FromStr;

use crate::error::PicasaError;

const CROPPABLE: [u32; 6] = [32, 48, 64, 72, 144, 160];
const EMBEDDABLE: [u32; 9] = [200, 288, 320, 400, 512, 576, 640, 720, 800];
const LARGE: [u32; 6] = [912, 1024, 1152, 1280, 1440, 1600];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crop {
    Cropped,
    Uncropped,
}

/// A valid image size code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub crop: Option<Crop>,
}

impl ImageSize {
    pub fn is_embeddable(&self) -> bool {
        !LARGE.contains(&self.width)
    }
}

impl FromStr for ImageSize {
    type Err = ();

    fn from_str(code: &str) -> Result<Self, ()> {
        let (digits, crop) = match code.as_bytes().last() {
            Some(b'c') => (&code[..code.len() - 1], Some(Crop::Cropped)),
            Some(b'u') => (&code[..code.len() - 1], Some(Crop::Uncropped)),
            _ => (code, None),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(());
        }
        let width: u32 = digits.parse().map_err(|_| ())?;

        let allowed = match crop {
            None => CROPPABLE.contains(&width) || EMBEDDABLE.contains(&width) || LARGE.contains(&width),
            Some(Crop::Cropped) => CROPPABLE.contains(&width),
            Some(Crop::Uncropped) => CROPPABLE.contains(&width) || EMBEDDABLE.contains(&width),
        };
        if allowed {
            Ok(ImageSize { width, crop })
        } else {
            Err(())
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.crop {
            Some(Crop::Cropped) => "c",
            Some(Crop::Uncropped) => "u",
            None => "",
        };
        write!(f, "{}{suffix}", self.width)
    }
}

/// A comma-separated list of size codes.
pub fn validate_thumbsize(value: &str) -> Result<(), PicasaError> {
    if value.split(',').all(|code| code.parse::<ImageSize>().is_ok()) {
        Ok(())
    } else {
        Err(PicasaError::invalid("thumbsize", value))
    }
}

/// A single size code.
pub fn validate_imgmax(value: &str) -> Result<(), PicasaError> {
    match value.parse::<ImageSize>() {
        Ok(_) => Ok(()),
        Err(()) => Err(PicasaError::invalid("imgmax", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_croppable_sizes() {
        for code in ["32", "72c", "72u", "160c", "144u"] {
            assert!(code.parse::<ImageSize>().is_ok(), "{code}");
        }
    }

    #[test]
    fn test_embeddable_sizes_are_uncropped_only() {
        assert!("800".parse::<ImageSize>().is_ok());
        assert!("288u".parse::<ImageSize>().is_ok());
        assert!("288c".parse::<ImageSize>().is_err());
    }

    #[test]
    fn test_large_sizes_take_no_suffix() {
        let size: ImageSize = "1600".parse().expect("valid");
        assert!(!size.is_embeddable());
        assert!("1600u".parse::<ImageSize>().is_err());
        assert!("1024c".parse::<ImageSize>().is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        for code in ["", "c", "invalid", "73", "72x", "-72", " 72", "72cc"] {
            assert!(code.parse::<ImageSize>().is_err(), "{code:?}");
        }
    }

    #[test]
    fn test_thumbsize_list() {
        assert!(validate_thumbsize("72c,144,800").is_ok());
        let err = validate_thumbsize("72c,invalid").unwrap_err();
        assert_eq!(err.to_string(), "Invalid thumbsize: 72c,invalid");
        assert!(validate_thumbsize("72,").is_err());
    }

    #[test]
    fn test_imgmax_single_value() {
        assert!(validate_imgmax("1600").is_ok());
        assert!(validate_imgmax("72,144").is_err());
        assert!(matches!(
            validate_imgmax("invalid"),
            Err(PicasaError::InvalidParameter { name: "imgmax", .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_valid_codes_display_back(idx in 0usize..6, crop in 0u8..3) {
            let suffix = ["", "c", "u"][crop as usize];
            let code = format!("{}{suffix}", CROPPABLE[idx]);
            let size: ImageSize = code.parse().expect("croppable sizes accept any suffix");
            prop_assert_eq!(size.to_string(), code);
        }
    }
}
