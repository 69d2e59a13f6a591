//! Request middleware.
//!
//! Purpose: request lifecycle concerns wrapped around every route. Order
//! from the outside in is [`Trace`], [`ErrorTranslator`], the session layer,
//! then [`AccessControl`].

pub mod access;
pub mod error_translator;
pub mod trace;

pub use access::AccessControl;
pub use error_translator::ErrorTranslator;
pub use trace::Trace;
