use std::fmt;

/// HTTP [Status Code][rfc].
///
/// Any integer is a valid status code, only a few of them have a known reason phrase. Unknown
/// codes are written with the `Unknown Status Code` reason.
///
/// [rfc]: <https://datatracker.ietf.org/doc/html/rfc9110#name-status-codes>
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl Default for StatusCode {
    #[inline]
    fn default() -> Self {
        Self::OK
    }
}

/// Reason phrase for status codes without a known one.
pub const UNKNOWN_REASON: &str = "Unknown Status Code";

macro_rules! status_code {
    (
        $(
            $(#[$doc:meta])*
            $int:literal $id:ident $msg:literal;
        )*
    ) => {
        impl StatusCode {
            /// Returns the reason phrase if the status code is known, e.g: `"OK"`.
            #[inline]
            pub const fn reason(&self) -> Option<&'static str> {
                match self.0 {
                    $(
                        $int => Some($msg),
                    )*
                    _ => None,
                }
            }

            /// Returns the full status line for known status code, e.g: `"HTTP/1.1 200 OK\r\n"`.
            #[inline]
            pub(crate) const fn static_line(&self) -> Option<&'static str> {
                match self.0 {
                    $(
                        $int => Some(concat!("HTTP/1.1 ", stringify!($int), " ", $msg, "\r\n")),
                    )*
                    _ => None,
                }
            }
        }

        impl StatusCode {
            $(
                $(#[$doc])*
                pub const $id: Self = Self($int);
            )*
        }
    };
}

status_code! {
    /// `200`. The request succeeded.
    200 OK "OK";
    /// `400`. The server cannot or will not process the request due to something that is
    /// perceived to be a client error.
    400 BAD_REQUEST "Bad Request";
    /// `404`. The server cannot find the requested resource.
    404 NOT_FOUND "Not Found";
    /// `500`. The server has encountered a situation it does not know how to handle.
    500 INTERNAL_SERVER_ERROR "Internal Server Error";
}

impl StatusCode {
    /// Create status code from an integer.
    #[inline]
    pub const fn from_u16(code: u16) -> Self {
        Self(code)
    }

    /// Returns status code value, e.g: `200`.
    #[inline]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the reason phrase, or `Unknown Status Code` when the status code is not known.
    #[inline]
    pub const fn reason_or_unknown(&self) -> &'static str {
        match self.reason() {
            Some(reason) => reason,
            None => UNKNOWN_REASON,
        }
    }
}

impl From<u16> for StatusCode {
    #[inline]
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason_or_unknown())
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StatusCode").field(&self.0).finish()
    }
}
