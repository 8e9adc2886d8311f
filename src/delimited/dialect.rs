//! Delimited record dialect

/// Field delimiter, quoting and escaping rules for one delimited format
///
/// The default is comma-separated, double-quote quoted, with embedded quotes
/// doubled. The escape byte only takes effect when `double_quote` is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Byte separating fields
    pub delimiter: u8,
    /// Byte enclosing fields that need quoting
    pub quote: u8,
    /// Byte that makes the following byte literal inside a quoted field
    pub escape: Option<u8>,
    /// Write embedded quotes as two quotes, and read two quotes as one
    pub double_quote: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            escape: Some(b'\\'),
            double_quote: true,
        }
    }
}

impl Dialect {
    /// Comma-separated values
    #[must_use]
    pub fn csv() -> Self {
        Self::default()
    }

    /// Tab-separated values
    #[must_use]
    pub fn tsv() -> Self {
        Self::default().with_delimiter(b'\t')
    }

    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub const fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    #[must_use]
    pub const fn with_escape(mut self, escape: Option<u8>) -> Self {
        self.escape = escape;
        self
    }

    #[must_use]
    pub const fn with_double_quote(mut self, double_quote: bool) -> Self {
        self.double_quote = double_quote;
        self
    }

    /// The escape byte that applies inside quoted fields, if any
    ///
    /// Without an escape byte, quotes are always doubled.
    pub(crate) fn active_escape(&self) -> Option<u8> {
        match self.escape {
            Some(escape) if !self.double_quote && escape != self.quote => Some(escape),
            _ => None,
        }
    }

    /// Whether embedded quotes are doubled
    pub(crate) fn doubles_quotes(&self) -> bool {
        self.active_escape().is_none()
    }
}
