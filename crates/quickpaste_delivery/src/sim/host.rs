use super::lock;
use crate::agent::{FrameSpec, HostError, PageHost, WindowId};
use std::sync::{Arc, Mutex};

/// An element appended by an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimNode {
    pub element_id: String,
    pub parent_id: Option<String>,
    pub frame: Option<FrameSpec>,
    pub window: Option<WindowId>,
}

#[derive(Debug, Default)]
struct PageDom {
    nodes: Vec<SimNode>,
    body_overflow: Option<String>,
    next_window: u64,
    detached: bool,
}

/// Handle to one page's DOM. Clones share the page, the way two agent
/// instances injected into the same tab do.
#[derive(Debug, Clone)]
pub struct SimHost {
    dom: Arc<Mutex<PageDom>>,
    extension_origin: String,
}

impl SimHost {
    pub fn new(extension_origin: &str) -> Self {
        Self {
            dom: Arc::new(Mutex::new(PageDom {
                next_window: 100,
                ..PageDom::default()
            })),
            extension_origin: extension_origin.to_string(),
        }
    }

    /// A page whose body is gone, so nothing can be mounted.
    pub fn detached(extension_origin: &str) -> Self {
        let host = Self::new(extension_origin);
        lock(&host.dom).detached = true;
        host
    }

    pub fn with_body_overflow(self, value: &str) -> Self {
        lock(&self.dom).body_overflow = Some(value.to_string());
        self
    }

    /// Number of elements carrying `element_id`.
    pub fn count(&self, element_id: &str) -> usize {
        lock(&self.dom)
            .nodes
            .iter()
            .filter(|node| node.element_id == element_id)
            .count()
    }

    pub fn nodes(&self) -> Vec<SimNode> {
        lock(&self.dom).nodes.clone()
    }

    /// The mounted editor frame, if any.
    pub fn frame(&self) -> Option<SimNode> {
        lock(&self.dom)
            .nodes
            .iter()
            .find(|node| node.frame.is_some())
            .cloned()
    }

    /// A fresh window id for an unrelated frame or popup.
    pub fn foreign_window(&self) -> WindowId {
        let mut dom = lock(&self.dom);
        dom.next_window += 1;
        WindowId(dom.next_window)
    }
}

impl PageHost for SimHost {
    fn has_element(&self, element_id: &str) -> bool {
        self.count(element_id) > 0
    }

    fn append_overlay(&mut self, element_id: &str) -> Result<(), HostError> {
        let mut dom = lock(&self.dom);
        if dom.detached {
            return Err(HostError::NoBody);
        }
        dom.nodes.push(SimNode {
            element_id: element_id.to_string(),
            parent_id: None,
            frame: None,
            window: None,
        });
        Ok(())
    }

    fn append_frame(&mut self, overlay_id: &str, frame: &FrameSpec) -> Result<WindowId, HostError> {
        let mut dom = lock(&self.dom);
        if !dom.nodes.iter().any(|node| node.element_id == overlay_id) {
            return Err(HostError::Dom(format!("no element #{}", overlay_id)));
        }
        dom.next_window += 1;
        let window = WindowId(dom.next_window);
        dom.nodes.push(SimNode {
            element_id: frame.element_id.clone(),
            parent_id: Some(overlay_id.to_string()),
            frame: Some(frame.clone()),
            window: Some(window),
        });
        Ok(window)
    }

    fn remove_element(&mut self, element_id: &str) {
        lock(&self.dom)
            .nodes
            .retain(|node| node.element_id != element_id);
    }

    fn body_overflow(&self) -> Option<String> {
        lock(&self.dom).body_overflow.clone()
    }

    fn set_body_overflow(&mut self, value: Option<&str>) {
        lock(&self.dom).body_overflow = value.map(str::to_string);
    }

    fn extension_url(&self, path: &str) -> String {
        format!("{}/{}", self.extension_origin, path)
    }
}
