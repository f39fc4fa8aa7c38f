//! Validation utilities for the School Inventory Management Platform

/// Validate an item display name (non-empty after trimming, bounded length).
pub fn validate_item_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.len() > 200 {
        return Err("Name must be at most 200 characters");
    }
    Ok(())
}

/// Validate a category name.
pub fn validate_category_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Category name cannot be empty");
    }
    if trimmed.len() > 100 {
        return Err("Category name must be at most 100 characters");
    }
    Ok(())
}

/// Validate a user's display name.
pub fn validate_full_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Full name cannot be empty");
    }
    if trimmed.len() > 200 {
        return Err("Full name must be at most 200 characters");
    }
    Ok(())
}

/// Validate a student name on an issued record.
pub fn validate_student_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Student name cannot be empty");
    }
    if trimmed.len() > 200 {
        return Err("Student name must be at most 200 characters");
    }
    Ok(())
}

/// Validate a display color hint in `#RRGGBB` form.
pub fn validate_color(color: &str) -> Result<(), &'static str> {
    let Some(hex) = color.strip_prefix('#') else {
        return Err("Color must be in #RRGGBB format");
    };
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Color must be in #RRGGBB format");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}
