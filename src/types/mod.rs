pub mod firestore;
pub mod login;
