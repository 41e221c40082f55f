//! Web session state held in the session store.

mod flash;

pub use flash::FlashMessages;
