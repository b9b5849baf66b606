/// Outcome of a single incremental parse step.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult<T, E> {
    /// Bytes are not sufficient for parsing, more IO read is required.
    Pending,
    /// Parse success.
    Ok(T),
    /// Parse failed.
    Err(E),
}

impl<T, E> ParseResult<T, E> {
    /// Returns `true` if the parse result is [`Pending`].
    ///
    /// [`Pending`]: ParseResult::Pending
    #[inline]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` if the parse result is [`Err`].
    ///
    /// [`Err`]: ParseResult::Err
    #[inline]
    pub const fn is_err(&self) -> bool {
        matches!(self, Self::Err(..))
    }

    /// Maps the error value, leaving `Pending` and `Ok` untouched.
    #[inline]
    pub fn map_err<F, O: FnOnce(E) -> F>(self, op: O) -> ParseResult<T, F> {
        match self {
            Self::Pending => ParseResult::Pending,
            Self::Ok(ok) => ParseResult::Ok(ok),
            Self::Err(err) => ParseResult::Err(op(err)),
        }
    }

    /// Convert into a `Result` where `Pending` is `None`.
    #[inline]
    pub fn into_result(self) -> Result<Option<T>, E> {
        match self {
            Self::Pending => Ok(None),
            Self::Ok(ok) => Ok(Some(ok)),
            Self::Err(err) => Err(err),
        }
    }
}
