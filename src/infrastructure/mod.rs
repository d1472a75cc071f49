//! External integrations: the backing key-value store.

pub mod store;
