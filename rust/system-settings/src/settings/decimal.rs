// Fixed-point helpers (18 decimals, truncating)
use crate::types::{U256, UNIT};

/// `x * y / UNIT`, `None` on overflow
pub fn multiply_decimal(x: U256, y: U256) -> Option<U256> {
    x.checked_mul(y).map(|p| p / UNIT)
}

/// `x * UNIT / y`, `None` on overflow or division by zero
pub fn divide_decimal(x: U256, y: U256) -> Option<U256> {
    x.checked_mul(UNIT)?.checked_div(y)
}
