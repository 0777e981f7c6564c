pub mod firebase_storage_rest;
