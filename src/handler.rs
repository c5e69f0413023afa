use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::http::HttpClient;
use crate::models::{AppError, GenerateRequest, GenerateResponse};
use crate::view::View;

/// Text rendered in place of a field the server left out
const MISSING_FIELD: &str = "undefined";

/// Text rendered for an explicit `null` error message
const NULL_MESSAGE: &str = "null";

/// Sends one generation request and decodes the reply.
///
/// The schema text is parsed before anything goes on the wire, so a
/// malformed schema never reaches the server.
///
/// # Errors
///
/// - [`AppError::InvalidSchema`] if `schema_text` is not valid JSON
/// - [`AppError::Transport`] if the request fails
/// - [`AppError::InvalidResponse`] if the reply is not a JSON object or a field has the wrong type
pub async fn generate<C>(
    client: &C,
    url: &str,
    schema_text: &str,
    question: &str,
) -> Result<GenerateResponse, AppError>
where
    C: HttpClient + ?Sized,
{
    let request = GenerateRequest::from_text(schema_text, question)
        .map_err(|e| AppError::InvalidSchema(e.to_string()))?;

    let body =
        serde_json::to_value(&request).map_err(|e| AppError::InvalidSchema(e.to_string()))?;

    debug!(url = %url, body = %body, "Sending generate request");

    let reply = client.post_json(url, &body).await?;

    serde_json::from_value(reply).map_err(|e| AppError::InvalidResponse(e.to_string()))
}

/// What the result display ends up showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server produced SQL
    Generated(String),
    /// The server answered with `success: false`
    Rejected(String),
    /// The request never produced a usable answer
    ServerError(String),
}

impl Outcome {
    #[must_use]
    pub fn from_result(result: Result<GenerateResponse, AppError>) -> Self {
        match result {
            // A null result display is shown empty
            Ok(response) if response.success => {
                Self::Generated(field_text(response.generated_sql, ""))
            }
            Ok(response) => Self::Rejected(field_text(response.error, NULL_MESSAGE)),
            Err(e) => Self::ServerError(e.to_string()),
        }
    }

    /// Text for the result display.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Generated(sql) => sql.clone(),
            Self::Rejected(message) => format!("Error: {message}"),
            Self::ServerError(description) => format!("Server Error: {description}"),
        }
    }

    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Generated(_) => "generated",
            Self::Rejected(_) => "rejected",
            Self::ServerError(_) => "server_error",
        }
    }
}

fn field_text(field: Option<Option<String>>, null_text: &str) -> String {
    match field {
        Some(Some(text)) => text,
        Some(None) => null_text.to_string(),
        None => MISSING_FIELD.to_string(),
    }
}

/// Result of one [`SubmitHandler::submit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The request settled and the display shows this outcome
    Completed(Outcome),
    /// Another submission was still in flight; nothing was done
    Busy,
}

/// Keeps the loading indicator visible while alive.
///
/// Hiding happens on drop, so every exit path of the holder hides it.
#[must_use = "the loading indicator is hidden as soon as the guard is dropped"]
pub struct LoadingGuard<'a, V: View + ?Sized> {
    view: &'a V,
}

impl<'a, V: View + ?Sized> LoadingGuard<'a, V> {
    pub fn acquire(view: &'a V) -> Self {
        view.set_loading(true);
        Self { view }
    }
}

impl<V: View + ?Sized> Drop for LoadingGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_loading(false);
    }
}

// Clears the in-flight flag on drop
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn try_enter(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Reads the inputs of a [`View`], asks the service for SQL and renders the
/// answer back into the view.
pub struct SubmitHandler<C> {
    client: C,
    url: String,
    in_flight: AtomicBool,
}

impl<C: HttpClient> SubmitHandler<C> {
    #[must_use]
    pub fn new(client: C, config: &Config) -> Self {
        Self {
            client,
            url: config.generate_url(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a submission is currently waiting on the server.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Runs one submission against `view`.
    ///
    /// Shows the loading indicator, clears the result display, performs the
    /// request and writes the outcome. The indicator is hidden again before
    /// this returns. A call made while another is in flight returns
    /// [`Submission::Busy`] and leaves `view` untouched.
    pub async fn submit<V: View + ?Sized>(&self, view: &V) -> Submission {
        let Some(_in_flight) = InFlight::try_enter(&self.in_flight) else {
            debug!("Submission already in flight, ignoring");
            return Submission::Busy;
        };

        let schema_text = view.schema_text();
        let question = view.question_text();

        let _loading = LoadingGuard::acquire(view);
        view.set_result("");

        info!(url = %self.url, "Requesting SQL generation");

        let outcome = Outcome::from_result(
            generate(&self.client, &self.url, &schema_text, &question).await,
        );

        match &outcome {
            Outcome::ServerError(description) => {
                warn!(error = %description, "Generate request failed");
            }
            _ => info!(outcome = outcome.kind(), "Generate request settled"),
        }

        view.set_result(&outcome.display_text());
        Submission::Completed(outcome)
    }
}
