use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("invalid decimal amount: {0:?}")]
    Invalid(String),

    #[error("amount out of range: {0:?}")]
    OutOfRange(String),
}

/// Exact decimal amount stored as a scaled integer (`units / 10^scale`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount {
    units: i128,
    scale: u32,
}

const MAX_SCALE: u32 = 30;

impl Amount {
    /// Parse decimal text such as `"120"`, `"-3.50"` or `"1.2e3"`
    pub fn parse(text: &str) -> Result<Self, AmountError> {
        let invalid = || AmountError::Invalid(text.to_string());
        let out_of_range = || AmountError::OutOfRange(text.to_string());

        let trimmed = text.trim();
        let (mantissa, exponent) = match trimmed.find(['e', 'E']) {
            Some(idx) => {
                let exp = trimmed[idx + 1..].parse::<i32>().map_err(|_| invalid())?;
                (&trimmed[..idx], exp)
            }
            None => (trimmed, 0),
        };

        let (negative, digits) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut units: i128 = 0;
        for b in whole.bytes().chain(fraction.bytes()) {
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add(i128::from(b - b'0')))
                .ok_or_else(out_of_range)?;
        }

        if units == 0 {
            return Ok(Self { units: 0, scale: 0 });
        }

        let fraction_digits = i64::try_from(fraction.len()).map_err(|_| out_of_range())?;
        let mut scale = fraction_digits - i64::from(exponent);
        if scale < 0 {
            let shift = u32::try_from(-scale).map_err(|_| out_of_range())?;
            let factor = 10i128.checked_pow(shift).ok_or_else(out_of_range)?;
            units = units.checked_mul(factor).ok_or_else(out_of_range)?;
            scale = 0;
        }

        let scale = u32::try_from(scale)
            .ok()
            .filter(|s| *s <= MAX_SCALE)
            .ok_or_else(out_of_range)?;

        Ok(Self {
            units: if negative { -units } else { units },
            scale,
        })
    }

    pub fn is_positive(&self) -> bool {
        self.units > 0
    }

    /// Split into `parts` equal shares in cents, rounding half to even
    pub fn split_cents(&self, parts: usize) -> Option<i128> {
        if parts == 0 {
            return None;
        }

        // cents = units * 100 / (10^scale * parts)
        let numerator = self.units.checked_mul(100)?;
        let denominator = 10i128.checked_pow(self.scale)?.checked_mul(i128::try_from(parts).ok()?)?;

        Some(div_round_half_even(numerator, denominator))
    }
}

fn div_round_half_even(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator.div_euclid(denominator);
    let remainder = numerator.rem_euclid(denominator);

    match (remainder * 2).cmp(&denominator) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 0 => quotient,
        std::cmp::Ordering::Equal => quotient + 1,
    }
}

/// Render cents as a two-place decimal string
pub fn format_cents(cents: i128) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Equal share of `total` across `members`, as a two-place decimal string
pub fn equal_share(total: &Amount, members: usize) -> Option<String> {
    total.split_cents(members).map(format_cents)
}
