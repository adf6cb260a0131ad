//! # Validation Module
//!
//! Input validation utilities for Bodega.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (React)                                             │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Stateless business rule validation                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  ├── CHECK (stock >= 0), CHECK (quantity > 0)                          │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock-sufficiency check is deliberately NOT here: it depends on
//! current state and lives inside the mutation service's transaction in
//! bodega-db, where it cannot race against concurrent movements.

use crate::error::ValidationError;
use crate::{MAX_EMPLOYEE_CODE_LEN, MAX_NAME_LEN, MAX_PRODUCT_CODE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity display name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 255 characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a product business code (`id_producto`).
///
/// ## Rules
/// - Optional; empty input means "no code"
/// - At most 100 characters
pub fn validate_product_code(code: Option<&str>) -> ValidationResult<Option<String>> {
    let code = match code {
        Some(c) => c.trim(),
        None => return Ok(None),
    };

    if code.is_empty() {
        return Ok(None);
    }

    if code.len() > MAX_PRODUCT_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "id_producto".to_string(),
            max: MAX_PRODUCT_CODE_LEN,
        });
    }

    Ok(Some(code.to_string()))
}

/// Validates a cashier employee code.
///
/// ## Rules
/// - Must not be empty
/// - At most 20 characters
/// - Only alphanumeric characters, hyphens, underscores
pub fn validate_employee_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "codigo_empleado".to_string(),
        });
    }

    if code.len() > MAX_EMPLOYEE_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "codigo_empleado".to_string(),
            max: MAX_EMPLOYEE_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "codigo_empleado".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(code.to_string())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - At most 255 characters
/// - Must contain exactly one '@' with a dot in the domain part
///
/// Light-weight on purpose: the mail server is the real validator.
pub fn validate_email(field: &str, email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if email.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }

    Ok(email.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a movement quantity.
///
/// ## Rules
/// - Must be strictly positive (> 0); zero and negatives are rejected
/// - No upper bound: restocks can be arbitrarily large
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Movimientos: Registrar                                                 │
/// │                                                                         │
/// │  User enters cantidad: 0                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(0) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "cantidad must be positive"               │
/// │       │                                                                 │
/// │       └── OK → Proceed to the mutation service                         │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "cantidad".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in centavos.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (unpriced items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "precio_venta".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an initial stock value for product creation.
///
/// Subsequent changes go through the movement ledger, which enforces
/// non-negativity transactionally; this only guards the starting point.
pub fn validate_initial_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Rules
/// - Must be a valid UUID format: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
///
/// ## Usage
/// Guards entity references in request bodies (e.g. a movement's `producto`)
/// so a malformed reference fails with a field-specific message instead of
/// a lookup miss.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("nombre", "  Coca Cola ").unwrap(), "Coca Cola");
        assert!(validate_name("nombre", "").is_err());
        assert!(validate_name("nombre", "   ").is_err());
        assert!(validate_name("nombre", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_product_code() {
        assert_eq!(
            validate_product_code(Some("COCA-123")).unwrap(),
            Some("COCA-123".to_string())
        );
        assert_eq!(validate_product_code(Some("  ")).unwrap(), None);
        assert_eq!(validate_product_code(None).unwrap(), None);
        assert!(validate_product_code(Some(&"A".repeat(200))).is_err());
    }

    #[test]
    fn test_validate_employee_code() {
        assert!(validate_employee_code("CAJ-01").is_ok());
        assert!(validate_employee_code("emp_2").is_ok());

        assert!(validate_employee_code("").is_err());
        assert!(validate_employee_code("has space").is_err());
        assert!(validate_employee_code(&"A".repeat(30)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("correo", "ana@tienda.mx").is_ok());
        assert!(validate_email("correo", "").is_err());
        assert!(validate_email("correo", "no-arroba").is_err());
        assert!(validate_email("correo", "a@b").is_err());
        assert!(validate_email("correo", "a@@b.c").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100_000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(2000).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("producto", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("producto", "").is_err());
        assert!(validate_uuid("producto", "not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_initial_stock() {
        assert!(validate_initial_stock(0).is_ok());
        assert!(validate_initial_stock(10).is_ok());
        assert!(validate_initial_stock(-1).is_err());
    }
}
