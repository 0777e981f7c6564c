pub mod firestore_rest;
pub mod in_memory;
pub mod value_codec;
