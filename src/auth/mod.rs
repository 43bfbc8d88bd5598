//! Authentication module
//!
//! XSOAR 8.x / XSIAM standard API keys: the key ID travels in the
//! `x-xdr-auth-id` header and the key itself in `Authorization`.

mod credentials;

pub use credentials::{Credentials, AUTH_ID_HEADER};
