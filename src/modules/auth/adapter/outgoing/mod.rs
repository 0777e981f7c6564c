pub mod identity_rest;
