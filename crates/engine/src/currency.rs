/// Currency of the ledger and the locale conventions used to render it.
///
/// The ledger is mono-currency (`BRL`, pt-BR conventions). Separators and
/// the number of fraction digits are modelled here, and the masker, the
/// canonical form and the display formatter all read them from this type.
///
/// ## Minor units
///
/// Amounts are stored as an `i64` number of **minor units** (see `Amount`).
/// `minor_units()` returns how many decimal digits separate major from minor
/// units: BRL has 2, so `10,50` ⇄ `1050`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Currency {
    #[default]
    Brl,
}

impl Currency {
    /// Symbol used by the display formatter.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Brl => "R$",
        }
    }

    /// Number of fraction digits.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Brl => 2,
        }
    }

    /// Minor units in one major unit.
    #[must_use]
    pub const fn minor_per_major(self) -> i64 {
        10_i64.pow(self.minor_units() as u32)
    }

    /// Separator between integer and fractional digits.
    #[must_use]
    pub const fn decimal_separator(self) -> char {
        match self {
            Currency::Brl => ',',
        }
    }

    /// Digit-group separator. Only the display formatter uses it; canonical
    /// strings never contain it.
    #[must_use]
    pub const fn thousands_separator(self) -> char {
        match self {
            Currency::Brl => '.',
        }
    }
}
