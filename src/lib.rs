/*!
A small college enrollment workflow.

Students ask to join courses, the course's coordinating professor approves
them, and only then can a grade be recorded. All state lives in a
[`store::Store`] that the caller owns and passes to every operation.
*/
pub mod admin;
pub mod auth;
pub mod config;
pub mod err;
pub mod models;
pub mod professor;
pub mod shell;
pub mod store;
pub mod student;

pub use err::Error;
pub use store::Store;
