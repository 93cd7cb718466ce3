//! Target data models.
//!
//! A data model fixes the widths of the C-level scalar types the back end
//! builds its canonical type nodes from. The same canonical node (say,
//! `long`) has different widths under different models.

use serde::{Deserialize, Serialize};

use crate::portable::FloatWidth;

/// Widths of the target's C scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DataModel {
    /// Pointer and size type width in bytes.
    pub pointer_bytes: u64,
    pub int_bytes: u64,
    pub long_bytes: u64,
    pub long_long_bytes: u64,
    /// Format used for `long double`.
    pub long_double: FloatWidth,
    /// Storage size of `long double` in bytes (x87 extended is padded).
    pub long_double_bytes: u64,
    /// Whether plain `char` is signed.
    pub char_is_signed: bool,
}

impl DataModel {
    /// LP64 on x86-64: 80-bit `long double` in 16 bytes of storage.
    pub fn lp64_x86() -> Self {
        Self {
            pointer_bytes: 8,
            int_bytes: 4,
            long_bytes: 8,
            long_long_bytes: 8,
            long_double: FloatWidth::F80,
            long_double_bytes: 16,
            char_is_signed: true,
        }
    }

    /// ILP32 on i686: 80-bit `long double` in 12 bytes of storage.
    pub fn ilp32_x86() -> Self {
        Self {
            pointer_bytes: 4,
            int_bytes: 4,
            long_bytes: 4,
            long_long_bytes: 8,
            long_double: FloatWidth::F80,
            long_double_bytes: 12,
            char_is_signed: true,
        }
    }

    /// LP64 on AArch64: IEEE quad `long double`, unsigned plain `char`.
    pub fn lp64_aarch64() -> Self {
        Self {
            pointer_bytes: 8,
            int_bytes: 4,
            long_bytes: 8,
            long_long_bytes: 8,
            long_double: FloatWidth::F128,
            long_double_bytes: 16,
            char_is_signed: false,
        }
    }

    pub fn pointer_bits(&self) -> u64 {
        self.pointer_bytes * 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_width_differs_between_models() {
        assert_eq!(DataModel::lp64_x86().long_bytes, 8);
        assert_eq!(DataModel::ilp32_x86().long_bytes, 4);
        assert_eq!(DataModel::ilp32_x86().pointer_bits(), 32);
    }

    #[test]
    fn aarch64_long_double_is_quad() {
        let model = DataModel::lp64_aarch64();
        assert_eq!(model.long_double, FloatWidth::F128);
        assert!(!model.char_is_signed);
    }
}
