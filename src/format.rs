//! Locale-independent number formatting
//!
//! Totals are always rendered in the Brazilian convention (`.` groups
//! thousands, `,` separates decimals) regardless of the host locale. Chart
//! point labels use SI-prefixed abbreviations with a fixed number of
//! significant digits.

/// Separators for a fixed numeral convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumeralConvention {
    pub thousands: char,
    pub decimal: char,
}

/// `1.234.567,89`
pub const PT_BR: NumeralConvention = NumeralConvention {
    thousands: '.',
    decimal: ',',
};

impl NumeralConvention {
    /// Format with a fixed number of decimals and grouped thousands
    pub fn format(&self, value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let fixed = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
        let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
        if value < 0.0 && !is_zero {
            out.push('-');
        }

        let digits = int_part.len();
        for (idx, ch) in int_part.chars().enumerate() {
            if idx > 0 && (digits - idx) % 3 == 0 {
                out.push(self.thousands);
            }
            out.push(ch);
        }

        if let Some(frac) = frac_part {
            out.push(self.decimal);
            out.push_str(frac);
        }

        out
    }
}

/// Format in the pt-BR convention
pub fn pt_br(value: f64, decimals: usize) -> String {
    PT_BR.format(value, decimals)
}

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Abbreviate with an SI prefix keeping `precision` significant digits
///
/// `150000 → "150k"`, `95432 → "95k"`, `1000 → "1.0k"`, `1234567 → "1.2M"`.
pub fn si_abbrev(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let precision = precision.max(1);

    let sci = format!("{:.*e}", precision - 1, value.abs());
    let (mantissa, exponent) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let coefficient: String = mantissa.chars().filter(|c| *c != '.').collect();

    let prefix_exponent = if value == 0.0 {
        0
    } else {
        exponent.div_euclid(3).clamp(-8, 8)
    };
    let int_digits = exponent - prefix_exponent * 3 + 1;
    let n = coefficient.len() as i32;

    let body = if int_digits == n {
        coefficient
    } else if int_digits > n {
        format!("{}{}", coefficient, "0".repeat((int_digits - n) as usize))
    } else if int_digits > 0 {
        let split = int_digits as usize;
        format!("{}.{}", &coefficient[..split], &coefficient[split..])
    } else {
        format!("0.{}{}", "0".repeat((-int_digits) as usize), coefficient)
    };

    let sign = if value < 0.0 { "-" } else { "" };
    let prefix = SI_PREFIXES[(prefix_exponent + 8) as usize];
    format!("{}{}{}", sign, body, prefix)
}
