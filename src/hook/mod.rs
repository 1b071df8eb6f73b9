//! Hook Layer: Event Boundary + Runner
//!
//! Prinsip desain:
//! - Caller-buffer reads: host menulis ke buffer milik runner
//! - Absence bukan failure: sumber yang tidak ada dilewati tanpa error
//! - Always accept: setiap invocation berakhir dengan Receipt sukses

mod host;
mod sponge;

pub use host::{var_string_blob, Host, SimHost};
pub use sponge::{run, Receipt, ACCEPT_CODE, ACCEPT_MESSAGE};
