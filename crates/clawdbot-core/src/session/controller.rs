use crate::constants::{prompts, replies};
use crate::error::ClawdError;
use crate::gateway::ModelGateway;
use crate::search::{format_results, WebSearch};
use crate::session::{assemble, Directive, MemoryStore, Session};

const SEARCH_PREFIX: &str = "search:";

/// Where an exchange's assistant turn came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Model,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    AwaitingReply,
}

/// Result of one completed exchange. The assistant turn is always appended —
/// gateway and search failures arrive here as placeholder reply text, never
/// as errors.
#[derive(Debug, Clone)]
pub struct ExchangeOutcome {
    pub reply: String,
    pub source: ReplySource,
    /// Set when the post-exchange save failed; the exchange itself stands.
    pub persist_error: Option<String>,
}

/// Owns the session for the process run and drives the exchange cycle:
/// append the user turn, dispatch to search or the model gateway, append the
/// assistant turn, persist the full sequence.
///
/// Exchanges are strictly serial — one call to [`handle_input`] at a time,
/// and the controller is `Idle` again only once persistence has run.
///
/// [`handle_input`]: SessionController::handle_input
pub struct SessionController {
    session: Session,
    directive: Directive,
    gateway: Box<dyn ModelGateway>,
    search: WebSearch,
    store: MemoryStore,
    state: ControllerState,
}

impl SessionController {
    /// Start with an empty session.
    pub fn new(
        directive: Directive,
        gateway: Box<dyn ModelGateway>,
        search: WebSearch,
        store: MemoryStore,
    ) -> Self {
        Self {
            session: Session::new(),
            directive,
            gateway,
            search,
            store,
            state: ControllerState::Idle,
        }
    }

    /// Start from the persisted turn sequence. An absent file is an empty
    /// history; a malformed file is logged and also treated as empty — the
    /// process must come up either way.
    pub fn restore(
        directive: Directive,
        gateway: Box<dyn ModelGateway>,
        search: WebSearch,
        store: MemoryStore,
    ) -> Self {
        let turns = match store.load() {
            Ok(turns) => turns,
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable memory file {}: {e}",
                    store.path().display()
                );
                Vec::new()
            }
        };

        let mut controller = Self::new(directive, gateway, search, store);
        controller.session = Session::from_turns(turns);
        controller
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn directive(&self) -> Directive {
        self.directive
    }

    /// Switch UI mode. The directive is not persisted; it only shapes
    /// prompts assembled from this point on.
    pub fn set_directive(&mut self, directive: Directive) {
        self.directive = directive;
    }

    /// True when the input is a search command rather than a model query.
    pub fn is_search_command(input: &str) -> bool {
        strip_search_prefix(input).is_some()
    }

    /// Run one full exchange cycle for a submitted user input.
    pub async fn handle_input(&mut self, input: &str) -> ExchangeOutcome {
        self.state = ControllerState::AwaitingReply;
        self.session.append_user(input);

        let (reply, source) = if let Some(query) = strip_search_prefix(input) {
            let reply = match self.search.search(&query).await {
                Ok(results) => format_results(&results),
                Err(e) => format!("{}{e}", replies::SEARCH_ERROR_PREFIX),
            };
            (reply, ReplySource::Search)
        } else {
            let prompt = assemble(self.directive.text(), self.session.turns());
            let reply = match self.gateway.generate(&prompt).await {
                Ok(reply) => reply,
                Err(e) => format!("{}{e}", replies::GATEWAY_ERROR_PREFIX),
            };
            (reply, ReplySource::Model)
        };

        self.session.append_assistant(reply.clone());

        let persist_error = self
            .store
            .save(self.session.turns())
            .err()
            .map(|e| e.to_string());
        if let Some(ref e) = persist_error {
            tracing::warn!("Failed to persist session: {e}");
        }

        self.state = ControllerState::Idle;
        ExchangeOutcome {
            reply,
            source,
            persist_error,
        }
    }

    /// Stateless file-analysis side channel: the content goes straight to
    /// the gateway wrapped in the fixed template, and nothing touches the
    /// session or the memory file.
    pub async fn analyze(&self, content: &str) -> Result<String, ClawdError> {
        analyze_source(self.gateway.as_ref(), content).await
    }
}

/// One-shot analysis against any gateway, independent of a running session.
pub async fn analyze_source(
    gateway: &dyn ModelGateway,
    content: &str,
) -> Result<String, ClawdError> {
    let prompt = prompts::ANALYZE_TEMPLATE.replace("{}", content);
    gateway.generate_oneshot(&prompt).await
}

fn strip_search_prefix(input: &str) -> Option<String> {
    let head = input.get(..SEARCH_PREFIX.len())?;
    if head.eq_ignore_ascii_case(SEARCH_PREFIX) {
        Some(input[SEARCH_PREFIX.len()..].trim().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_prefix_is_case_insensitive() {
        assert!(SessionController::is_search_command("search: rust ownership"));
        assert!(SessionController::is_search_command("Search: rust ownership"));
        assert!(SessionController::is_search_command("SEARCH:rust"));
        assert!(!SessionController::is_search_command("research: rust"));
        assert!(!SessionController::is_search_command("tell me about search:"));
    }

    #[test]
    fn stripped_query_is_trimmed() {
        assert_eq!(
            strip_search_prefix("Search:   rust ownership  "),
            Some("rust ownership".to_string())
        );
    }

    #[test]
    fn short_and_multibyte_inputs_do_not_classify() {
        assert!(!SessionController::is_search_command("hi"));
        assert!(!SessionController::is_search_command("héllo: world"));
    }
}
