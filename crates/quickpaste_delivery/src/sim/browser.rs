use super::{lock, SimDocument, SimHost};
use crate::{
    agent::PageAgent,
    coordinator::{Browser, TabInfo, TransportError},
    insert::attempt_insert,
    payload::Payload,
    protocol::{AgentMessage, InsertReport, TabId},
    restricted::RestrictedPages,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// Origin used for extension URLs in the simulation.
pub const SIM_EXTENSION_ORIGIN: &str = "chrome-extension://quickpaste";

/// Per-API call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimCalls {
    pub active_tab: usize,
    pub execute_insert: usize,
    pub send_message: usize,
    pub inject_script: usize,
    pub inject_stylesheet: usize,
    pub open_tab: usize,
}

impl SimCalls {
    /// Messaging and injection attempts made against pages.
    pub fn page_contacts(&self) -> usize {
        self.execute_insert + self.send_message + self.inject_script + self.inject_stylesheet
    }
}

/// One open tab.
pub struct SimTab {
    pub id: TabId,
    pub url: String,
    pub document: SimDocument,
    pub host: SimHost,
    /// Agent instances listening for runtime messages in this page.
    pub agents: Vec<PageAgent<SimHost>>,
    pub stylesheets: usize,
}

struct BrowserState {
    tabs: Vec<SimTab>,
    active: Option<TabId>,
    active_has_id: bool,
    url_hidden: bool,
    next_tab: u32,
    calls: SimCalls,
    scripting_blocked: RestrictedPages,
    query_error: Option<String>,
    injection_error: Option<String>,
    injected_agents_listen: bool,
    refuse_new_tabs: bool,
}

/// A browser window with tabs, the scripting and messaging APIs, and the
/// page agents living in those tabs.
pub struct SimBrowser {
    state: Mutex<BrowserState>,
}

impl Default for SimBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBrowser {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BrowserState {
                tabs: Vec::new(),
                active: None,
                active_has_id: true,
                url_hidden: false,
                next_tab: 1,
                calls: SimCalls::default(),
                scripting_blocked: RestrictedPages::default(),
                query_error: None,
                injection_error: None,
                injected_agents_listen: true,
                refuse_new_tabs: false,
            }),
        }
    }

    /// Open `url` showing `document` and make it the active tab.
    pub fn open_page(&self, url: &str, document: SimDocument) -> TabId {
        self.open_page_with_host(url, document, SimHost::new(SIM_EXTENSION_ORIGIN))
    }

    /// Like [`SimBrowser::open_page`] with a prepared page DOM.
    pub fn open_page_with_host(&self, url: &str, document: SimDocument, host: SimHost) -> TabId {
        let mut state = lock(&self.state);
        let id = TabId(state.next_tab);
        state.next_tab += 1;
        state.tabs.push(SimTab {
            id,
            url: url.to_string(),
            document,
            host,
            agents: Vec::new(),
            stylesheets: 0,
        });
        state.active = Some(id);
        id
    }

    /// Run the declared content script in `tab`, as on page load.
    pub fn add_resident_agent(&self, tab: TabId) {
        let mut state = lock(&self.state);
        if let Some(tab) = state.tabs.iter_mut().find(|candidate| candidate.id == tab) {
            let agent = PageAgent::new(tab.host.clone());
            tab.agents.push(agent);
        }
    }

    pub fn set_active(&self, tab: Option<TabId>) {
        lock(&self.state).active = tab;
    }

    /// Report the active tab without an id, as for some devtools windows.
    pub fn hide_active_tab_id(&self) {
        lock(&self.state).active_has_id = false;
    }

    /// Report tabs without their URL, as without the `tabs` permission.
    pub fn hide_tab_urls(&self) {
        lock(&self.state).url_hidden = true;
    }

    pub fn fail_tab_query(&self, message: &str) {
        lock(&self.state).query_error = Some(message.to_string());
    }

    pub fn fail_injection(&self, message: &str) {
        lock(&self.state).injection_error = Some(message.to_string());
    }

    /// Injected scripts load but never register a message listener.
    pub fn silence_injected_agents(&self) {
        lock(&self.state).injected_agents_listen = false;
    }

    pub fn refuse_new_tabs(&self) {
        lock(&self.state).refuse_new_tabs = true;
    }

    pub fn calls(&self) -> SimCalls {
        lock(&self.state).calls
    }

    /// Inspect or drive a tab.
    pub fn with_tab<R>(&self, tab: TabId, inspect: impl FnOnce(&mut SimTab) -> R) -> Option<R> {
        let mut state = lock(&self.state);
        state
            .tabs
            .iter_mut()
            .find(|candidate| candidate.id == tab)
            .map(inspect)
    }

    /// URLs of every open tab, in opening order.
    pub fn tab_urls(&self) -> Vec<String> {
        lock(&self.state)
            .tabs
            .iter()
            .map(|tab| tab.url.clone())
            .collect()
    }
}

impl BrowserState {
    fn scriptable_tab(&mut self, id: TabId) -> Result<&mut SimTab, TransportError> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|tab| tab.id == id)
            .ok_or(TransportError::NoSuchTab(id.0))?;
        if self.scripting_blocked.is_restricted(&tab.url) {
            return Err(TransportError::Restricted {
                url: tab.url.clone(),
            });
        }
        Ok(tab)
    }
}

#[async_trait]
impl Browser for SimBrowser {
    async fn active_tab(&self) -> Result<Option<TabInfo>, TransportError> {
        let mut state = lock(&self.state);
        state.calls.active_tab += 1;
        if let Some(message) = &state.query_error {
            return Err(TransportError::Runtime(message.clone()));
        }
        let Some(active) = state.active else {
            return Ok(None);
        };
        let url = state
            .tabs
            .iter()
            .find(|tab| tab.id == active)
            .map(|tab| tab.url.clone())
            .filter(|_| !state.url_hidden);
        Ok(Some(TabInfo {
            id: state.active_has_id.then_some(active),
            url,
        }))
    }

    async fn execute_insert(&self, tab: TabId, payload: &Payload) -> Result<InsertReport, TransportError> {
        let mut state = lock(&self.state);
        state.calls.execute_insert += 1;
        let tab = state.scriptable_tab(tab)?;
        Ok(attempt_insert(&mut tab.document, payload))
    }

    async fn send_message(&self, tab: TabId, message: &AgentMessage) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        state.calls.send_message += 1;
        let tab = state
            .tabs
            .iter_mut()
            .find(|candidate| candidate.id == tab)
            .ok_or(TransportError::NoSuchTab(tab.0))?;
        if tab.agents.is_empty() {
            return Err(TransportError::NoReceiver);
        }
        for agent in &mut tab.agents {
            agent
                .handle_runtime_message(message)
                .map_err(|err| TransportError::Runtime(err.to_string()))?;
        }
        Ok(())
    }

    async fn inject_agent_script(&self, tab: TabId) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        state.calls.inject_script += 1;
        if let Some(message) = &state.injection_error {
            return Err(TransportError::Runtime(message.clone()));
        }
        let listens = state.injected_agents_listen;
        let tab = state.scriptable_tab(tab)?;
        if listens {
            let agent = PageAgent::new(tab.host.clone());
            tab.agents.push(agent);
        }
        Ok(())
    }

    async fn inject_agent_stylesheet(&self, tab: TabId) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        state.calls.inject_stylesheet += 1;
        let tab = state.scriptable_tab(tab)?;
        tab.stylesheets += 1;
        Ok(())
    }

    async fn open_tab(&self, url: &str) -> Result<TabId, TransportError> {
        {
            let mut state = lock(&self.state);
            state.calls.open_tab += 1;
            if state.refuse_new_tabs {
                return Err(TransportError::Runtime(
                    "Tabs cannot be edited right now".to_string(),
                ));
            }
        }
        Ok(self.open_page(url, SimDocument::default()))
    }

    fn extension_url(&self, path: &str) -> String {
        format!("{}/{}", SIM_EXTENSION_ORIGIN, path)
    }
}
