//! # HTTP Handlers
//!
//! One module per API resource, mirroring the frontend's pages:
//!
//! - [`products`] - `/api/productos` (+ photo upload)
//! - [`customers`] - `/api/clientes`
//! - [`workers`] - `/api/trabajadores`
//! - [`cashiers`] - `/api/cajeros`
//! - [`movements`] - `/api/movimientos` (the ledger surface)
//!
//! ## DTO Convention
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Domain type (bodega-core)         DTO (this module)                    │
//! │  English field names          ◄──► Spanish wire names                   │
//! │                                                                         │
//! │  Product.name                 ◄──► "nombre"                             │
//! │  Product.price_cents (i64)    ◄──► "precio_venta": 20.0                 │
//! │  StockMovement.kind           ◄──► "tipo": "entrada" | "salida"         │
//! │                                                                         │
//! │  The wire names are the contract the React frontend already speaks;     │
//! │  the domain names are ours.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cashiers;
pub mod customers;
pub mod movements;
pub mod products;
pub mod workers;

/// Converts a wire-format decimal amount (e.g. `20.5`) to centavos.
///
/// Rounded, not truncated: `19.999` from a lossy frontend float is 2000,
/// not 1999.
pub(crate) fn centavos_from_decimal(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Converts centavos back to the wire-format decimal amount.
pub(crate) fn decimal_from_centavos(cents: i64) -> f64 {
    cents as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centavos_round_trip() {
        assert_eq!(centavos_from_decimal(20.0), 2000);
        assert_eq!(centavos_from_decimal(19.999), 2000);
        assert_eq!(centavos_from_decimal(0.01), 1);
        assert_eq!(decimal_from_centavos(2000), 20.0);
        assert_eq!(decimal_from_centavos(1), 0.01);
    }
}
