use std::sync::mpsc;

use async_trait::async_trait;

use crate::{Notification, PageSnapshot};

/// Live page access provided by the embedding host.
#[async_trait(?Send)]
pub trait PageHost {
    /// Current DOM of the page.
    async fn snapshot(&mut self) -> PageSnapshot;
    /// Scrolls every element matching `container_css` down by `dy` pixels.
    async fn scroll_containers(&mut self, container_css: &str, dy: i32);
}

/// A page that never changes; scrolling does nothing.
#[derive(Debug, Clone)]
pub struct StaticPage {
    snapshot: PageSnapshot,
}

impl StaticPage {
    pub fn new(snapshot: PageSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait(?Send)]
impl PageHost for StaticPage {
    async fn snapshot(&mut self) -> PageSnapshot {
        self.snapshot.clone()
    }

    async fn scroll_containers(&mut self, _container_css: &str, _dy: i32) {}
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("no listener for notification")]
    NoListener,
    #[error("notification delivery failed: {0}")]
    Failed(String),
}

/// Outbound channel to the popup.
pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<(), DeliveryError>;
}

pub struct ChannelNotifier {
    tx: mpsc::Sender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::Sender<Notification>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), DeliveryError> {
        self.tx
            .send(notification.clone())
            .map_err(|_| DeliveryError::NoListener)
    }
}
