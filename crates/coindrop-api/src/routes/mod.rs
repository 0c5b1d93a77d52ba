//! HTTP route modules.
//!
//! - [`webhook`] — inbound provider notifications (`POST /webhook`)
//! - [`redeem`] — one-shot reward redemption (`POST /redeem`)

pub mod redeem;
pub mod webhook;
