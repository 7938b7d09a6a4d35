//! Status enums stored as text columns

/// Declares a status enum backed by a TEXT column. Unknown text decodes to
/// `Unknown` rather than failing the whole row.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
            Unknown,
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Unknown => "Unknown",
                }
            }

            /// Case-insensitive parse of user input; `None` for anything
            /// that is not a known status.
            pub fn parse(input: &str) -> Option<Self> {
                let input = input.trim();
                $(
                    if input.eq_ignore_ascii_case($text) {
                        return Some($name::$variant);
                    }
                )+
                None
            }
        }

        impl From<String> for $name {
            fn from(v: String) -> Self {
                match v.as_str() {
                    $($text => $name::$variant,)+
                    _ => $name::Unknown,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// MembershipStatus
// ---------------------------------------------------------------------------

text_enum! {
    /// Membership status (Members.MembershipStatus)
    MembershipStatus {
        Active => "Active",
        Inactive => "Inactive",
        Suspended => "Suspended",
    }
}

// ---------------------------------------------------------------------------
// BorrowingStatus
// ---------------------------------------------------------------------------

text_enum! {
    /// Borrowing status (Borrowings.Status)
    BorrowingStatus {
        Borrowed => "Borrowed",
        Returned => "Returned",
        Overdue => "Overdue",
    }
}

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

text_enum! {
    /// Reservation status (Reservations.Status)
    ReservationStatus {
        Pending => "Pending",
        Fulfilled => "Fulfilled",
        Cancelled => "Cancelled",
        Expired => "Expired",
    }
}

// ---------------------------------------------------------------------------
// FineStatus
// ---------------------------------------------------------------------------

text_enum! {
    /// Fine status (Fines.Status)
    FineStatus {
        Unpaid => "Unpaid",
        Paid => "Paid",
    }
}
