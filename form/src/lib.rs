//! # Contact Form Logic
//!
//! Client-side behavior of the contact form, kept free of any page concerns
//! so the whole flow runs headless under test.
//!
//! ## Flow
//!
//! - User submits the form
//! - Every rule runs; failures render inline, one per offending field
//! - On a clean pass the payload is POSTed to `/api/contact`
//! - The submit control is disabled for the duration of the call, so a user
//!   can never have two submissions in flight at once
//! - Success shows a notice that dismisses itself, then resets the fields
//! - Failure (including timeout) re-enables the control and shows an error;
//!   the form is never left stuck in its busy state
//!
//! ## Rules
//!
//! - name: trimmed length of at least 2
//! - email: `local@domain.tld` shape, nothing fancier
//! - message: trimmed length of at least 10
//! - company: honeypot, sent along untouched; the server decides what it means
//!
//! ## Rendering
//!
//! All page mutation goes through the [`submit::FormUi`] adapter. The page
//! glue implements it; everything else here stays pure.

pub mod submit;
pub mod transport;
pub mod validate;

pub use submit::{FormUi, SubmitOutcome, Submitter};
pub use transport::{HttpTransport, Transport, TransportError};
pub use validate::{ContactForm, ContactPayload, Field, FieldError, validate};
