use core::fmt;

/// Why a registration left the task table untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Priority outside `0..MAX_PRIORITY`
    InvalidPriority,
    /// The entry already owns an active slot
    Duplicate,
    /// No free slot left
    TableFull,
}

impl Error {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::InvalidPriority => "invalid priority",
            Error::Duplicate => "task already scheduled",
            Error::TableFull => "task table full",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ufmt::uDisplay for Error {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        f.write_str(self.as_str())
    }
}
