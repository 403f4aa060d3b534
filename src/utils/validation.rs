use crate::utils::error::{GymError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GymError::validation(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(GymError::validation(
            field_name,
            path,
            "Path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension) => Ok(()),
        Some(extension) => Err(GymError::validation(
            field_name,
            file,
            format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        )),
        None => Err(GymError::validation(
            field_name,
            file,
            "File has no extension or invalid filename",
        )),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GymError::validation(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Accepts `1..=u32::MAX` and narrows it.
pub fn validate_capacity(field_name: &str, value: i64) -> Result<u32> {
    if value < 1 {
        return Err(GymError::validation(
            field_name,
            value,
            "Value must be at least 1",
        ));
    }
    u32::try_from(value).map_err(|_| {
        GymError::validation(
            field_name,
            value,
            format!("Value must not exceed {}", u32::MAX),
        )
    })
}
