use std::sync::{Mutex, PoisonError};

/// Browser-level navigation used once a flow reaches a terminal page
pub trait Navigator: Send + Sync {
    /// Full page load; all client state is rebuilt from the URL
    fn full_page_load(&self, url: &str);

    /// History back, offered as the manual retry after a failed payment
    fn go_back(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Load(String),
    Back,
}

/// Navigator that keeps a log instead of touching a browser
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<NavigationEvent>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn loaded_urls(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                NavigationEvent::Load(url) => Some(url),
                NavigationEvent::Back => None,
            })
            .collect()
    }
}

impl Navigator for RecordingNavigator {
    fn full_page_load(&self, url: &str) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(NavigationEvent::Load(url.to_string()));
    }

    fn go_back(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(NavigationEvent::Back);
    }
}
