//! The quick-swap order form core.
//!
//! Pure, synchronous logic: numeric input sanitization ([`input`]),
//! depth-weighted pricing and submit gating ([`pricing`]), the order
//! draft state machine ([`draft`]), and pre-flight submit checks
//! ([`submit`]). Nothing here touches the network or the terminal; the
//! surrounding application feeds it depth, balances, and reference
//! prices and renders what it derives.

pub mod draft;
pub mod input;
pub mod pricing;
pub mod submit;

pub use draft::{FormContext, FormEvent, OrderDraft, SubmitPayload};
pub use input::{fits_precision, format_with_precision, parse_or_zero, sanitize_numeric_input};
pub use pricing::{is_submit_disabled, market_total, order_total, safe_price};
pub use submit::{OrderRejection, preflight};
