//! Client for a natural-language-to-SQL service.
//!
//! [`handler::SubmitHandler`] reads a database schema and a question from a
//! [`view::View`], posts them to the service's `/generate` endpoint and
//! writes the generated SQL, or an error message, back into the view.

pub mod config;
pub mod handler;
pub mod http;
pub mod models;
pub mod view;
