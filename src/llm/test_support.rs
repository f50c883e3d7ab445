//! Mock HTTP server plumbing for exercising the blocking provider clients.

use super::Message;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// A wiremock server kept alive by its own multi-threaded runtime so blocking
/// clients can be called from the test thread.
pub struct MockProvider {
    // Declared first so the server is dropped while its runtime is still alive.
    pub server: MockServer,
    pub runtime: Runtime,
}

impl MockProvider {
    pub fn start() -> Self {
        let runtime = Runtime::new().expect("tokio runtime should start");
        let server = runtime.block_on(MockServer::start());
        MockProvider { server, runtime }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Panic unless every mounted mock saw exactly the calls it expected.
    pub fn verify(&self) {
        self.runtime.block_on(self.server.verify());
    }
}

pub fn sample_conversation() -> Vec<Message> {
    vec![
        Message::user("https://github.com/acme/widgets"),
        Message::assistant("Thanks. What about the branch?"),
        Message::user("feature/login"),
    ]
}
