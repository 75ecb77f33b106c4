//! DNS MX resolution.
//!
//! The public entry point is [`check_mx`], which performs a synchronous lookup
//! using the system resolver bounded by [`MxOptions`] and returns a
//! [`MxStatus`] describing the outcome.

mod error;
mod options;
mod resolver;
mod types;

pub use error::MxError as Error;
pub use options::MxOptions;
pub use resolver::{
    LookupHost, LookupMx, SystemResolver, check_mx, check_mx_with_options, normalize_domain,
    resolve_host,
};
pub use types::{MxDiagnostic, MxRecord, MxStatus};

pub(crate) use resolver::resolve_with;
